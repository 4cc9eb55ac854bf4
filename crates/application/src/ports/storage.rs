//! Collection storage port

use std::future::Future;

use thiserror::Error;
use workbench_domain::Collection;

use super::FileSystemError;

/// Errors raised by storage adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying file system failed.
    #[error("storage I/O failed: {0}")]
    FileSystem(#[from] FileSystemError),

    /// A stored snapshot could not be decoded.
    #[error("stored collection {id} is unreadable: {message}")]
    Corrupt {
        /// Collection id or file name.
        id: String,
        /// Decoder message.
        message: String,
    },

    /// A snapshot could not be encoded.
    #[error("failed to encode collection {id}: {message}")]
    Encode {
        /// Collection id.
        id: String,
        /// Encoder message.
        message: String,
    },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable key-value storage of collection snapshots, keyed by collection id.
///
/// Writes are last-write-wins; no optimistic concurrency check is made.
pub trait CollectionStorage: Send + Sync {
    /// Loads a collection, or `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read.
    fn get(&self, id: &str) -> impl Future<Output = StorageResult<Option<Collection>>> + Send;

    /// Loads every stored collection.
    ///
    /// # Errors
    ///
    /// Returns an error if any snapshot cannot be read.
    fn get_all(&self) -> impl Future<Output = StorageResult<Vec<Collection>>> + Send;

    /// Stores a snapshot, replacing any previous one with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn put(&self, collection: &Collection) -> impl Future<Output = StorageResult<()>> + Send;

    /// Deletes a snapshot. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing snapshot cannot be removed.
    fn delete(&self, id: &str) -> impl Future<Output = StorageResult<()>> + Send;
}
