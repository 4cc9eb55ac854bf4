//! Storage adapters
//!
//! - [`TokioFileSystem`]: the `FileSystem` port over `tokio::fs`
//! - [`FileCollectionStorage`]: one JSON file per collection
//! - [`InMemoryStorage`]: a process-local map, for tests and scratch sessions

mod file_storage;
mod file_system;
mod memory_storage;

pub use file_storage::FileCollectionStorage;
pub use file_system::TokioFileSystem;
pub use memory_storage::InMemoryStorage;
