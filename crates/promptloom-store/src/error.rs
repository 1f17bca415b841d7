//! Storage error types.

use thiserror::Error;

/// Errors surfaced by the persistence layer.
///
/// A corrupt persisted document is not an error: it loads as
/// [`LoadOutcome::Recovered`](crate::LoadOutcome::Recovered). Missing ids are reported
/// through `Option`/`bool` return values rather than through this type.
#[derive(Error, Debug)]
pub enum StoreError {
    /// IO error from the storage medium
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization of an in-memory document failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Document key cannot be mapped onto the storage medium
    #[error("Invalid document key: {key}")]
    InvalidKey { key: String },

    /// Import payload rejected; existing state untouched
    #[error("Invalid import payload: {0}")]
    InvalidImport(String),
}

impl StoreError {
    pub fn invalid_import(message: impl Into<String>) -> Self {
        Self::InvalidImport(message.into())
    }
}

/// Storage result type
pub type StoreResult<T> = Result<T, StoreError>;
