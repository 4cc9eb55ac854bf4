//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod file_system;
mod storage;
mod transport;

pub use file_system::{FileSystem, FileSystemError};
pub use storage::{CollectionStorage, StorageError, StorageResult};
pub use transport::{
    FormPart, Transport, TransportBody, TransportError, TransportRequest, TransportResponse,
    TransportResult,
};
