//! External prompt search.
//!
//! [`SearchAdapter`] is the seam between the prompt store and any third-party gallery;
//! [`LexicaClient`] implements it over HTTP and [`SearchSession`] drops late results.

mod adapter;
mod error;
mod lexica;
mod session;

pub use adapter::{ExternalImage, SearchAdapter};
pub use error::{SearchError, SearchResult};
pub use lexica::{LexicaClient, DEFAULT_TIMEOUT, LEXICA_API_BASE, LEXICA_SOURCE_NAME};
pub use session::{SearchOutcome, SearchSession};

/// Inspiration queries offered when the search box is empty.
pub const SUGGESTED_QUERIES: &[&str] = &[
    "fantasy landscape",
    "cyberpunk city",
    "portrait photography",
    "abstract art",
    "anime character",
    "steampunk",
    "nature photography",
    "sci-fi spaceship",
    "medieval castle",
    "underwater scene",
    "neon lights",
    "surreal dreamscape",
    "minimalist design",
    "vintage poster",
    "character concept art",
];

/// Pick a suggestion using `seed` as the source of variation.
pub fn suggested_query(seed: u64) -> &'static str {
    SUGGESTED_QUERIES[(seed % SUGGESTED_QUERIES.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_query_wraps_around() {
        assert_eq!(suggested_query(0), "fantasy landscape");
        assert_eq!(suggested_query(14), "character concept art");
        assert_eq!(suggested_query(15), suggested_query(0));
        assert_eq!(suggested_query(u64::MAX), SUGGESTED_QUERIES[(u64::MAX % 15) as usize]);
    }
}
