//! Application error types

use thiserror::Error;
use workbench_domain::DomainError;

use crate::ports::{StorageError, TransportError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A tree operation was rejected.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A request could not be sent.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// No collection with this id is stored.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
