//! Workbench Infrastructure - Adapters and implementations
//!
//! This crate provides the format importers and the Postman exporter, plus
//! concrete implementations of the ports defined in the application layer.

pub mod adapters;
pub mod config;
pub mod export;
pub mod import;
pub mod persistence;
pub mod serialization;
pub mod telemetry;

pub use adapters::ReqwestTransport;
pub use config::{ConfigError, ConfigResult, WorkbenchSettings};
pub use export::{export_collection, export_collection_json};
pub use import::{
    FormatKind, ImportConfig, ImportError, ImportOutcome, ImportResult, ImportWarning,
    Normalized, WarningSeverity, WarningStats, detect, import_document, import_file, parse,
};
pub use persistence::{FileCollectionStorage, InMemoryStorage, TokioFileSystem};
pub use serialization::{
    SerializationError, from_json, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
pub use telemetry::init_tracing;
