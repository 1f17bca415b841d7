use thiserror::Error;

/// Failures of an external search.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport failure before a response arrived
    #[error("network error: {0}")]
    Network(String),

    /// Non-success status from the search service
    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("decode error: {0}")]
    Decode(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::Decode(err.to_string())
        } else {
            SearchError::Network(err.to_string())
        }
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
