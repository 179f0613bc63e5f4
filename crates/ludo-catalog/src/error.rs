use ludo_core::{StorageError, ValidationError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("{0} not found")]
    NotFound(String),
    /// A write inside the create transaction failed; nothing was committed.
    #[error("transaction failed: {0}")]
    Transaction(#[source] StorageError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
