//! Domain error types

use thiserror::Error;

/// Domain-level errors raised by tree operations and model validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No folder or request with the given id exists in the collection.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// The target parent is a request and cannot own children.
    #[error("node {0} cannot contain children")]
    NotAContainer(String),

    /// An id being inserted is already used by another node.
    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    /// A variable with the same name already exists in the collection.
    #[error("duplicate variable name: {0}")]
    DuplicateVariable(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}

impl DomainError {
    /// Returns true for lookup misses, which callers usually treat as recoverable.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_))
    }
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
