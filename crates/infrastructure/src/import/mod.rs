//! Import of external API descriptions
//!
//! Supported formats:
//! - `OpenAPI` 3.x (JSON or YAML)
//! - RAML 1.0
//! - Postman Collection v2.1
//! - GraphQL schema files (introspection request only)

mod document;
pub mod graphql;
pub mod importer;
pub mod openapi;
pub mod postman;
pub mod raml;
pub mod warning;

pub use importer::{
    FormatKind, ImportConfig, ImportError, ImportOutcome, ImportResult, Normalized,
    POSTMAN_SCHEMA_MARKER, detect, import_document, import_file, parse,
};
pub use warning::{ImportWarning, WarningSeverity, WarningStats};
