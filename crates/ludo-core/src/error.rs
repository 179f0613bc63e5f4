use serde::Serialize;
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("referenced record does not exist: {0}")]
    MissingReference(String),
    #[error("migration failed: {0}")]
    Migration(String),
}

/// A rejected input field.
///
/// Serializes as `{"field": ..., "error": ...}`, which is also the body
/// returned to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {error}")]
pub struct ValidationError {
    pub field: String,
    pub error: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error: error.into(),
        }
    }
}
