//! Format detection and import entry points
//!
//! Detection walks an ordered capability table; the first format whose
//! probe accepts the document wins. Parsing then runs the matching
//! normalizer and checks the result against the configured limits, so a
//! document that fails any step never yields a partial collection.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use workbench_application::ports::{FileSystem, FileSystemError};
use workbench_domain::{Collection, Folder};

use super::document::{parse_document, parse_yaml, str_field};
use super::warning::{ImportWarning, WarningStats};
use super::{graphql, openapi, postman, raml};

/// Substring of `info.schema` that marks a Postman collection.
pub const POSTMAN_SCHEMA_MARKER: &str = "getpostman.com";

/// Import configuration options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportConfig {
    /// Maximum document size in bytes (default: 10 MiB)
    pub max_file_size: usize,
    /// Maximum folder nesting depth (default: 10)
    pub max_depth: usize,
    /// Maximum number of folders plus requests (default: 1000)
    pub max_items: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            max_depth: 10,
            max_items: 1000,
        }
    }
}

/// A supported external format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// `OpenAPI` 3.x
    OpenApi,
    /// RAML 1.0 / 0.8
    Raml,
    /// Postman Collection v2.x
    Postman,
    /// GraphQL schema or query text
    GraphQl,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenApi => "OpenAPI",
            Self::Raml => "RAML",
            Self::Postman => "Postman",
            Self::GraphQl => "GraphQL",
        })
    }
}

/// Import error types
#[derive(Debug, Error)]
pub enum ImportError {
    /// No known format matched the document.
    #[error("Unsupported API format: {0}")]
    UnsupportedFormat(String),

    /// The document matched a format but could not be normalized.
    #[error("Invalid {kind} document: {cause}")]
    Malformed {
        /// Detected format
        kind: FormatKind,
        /// Parser message
        cause: String,
    },

    /// The document exceeds the maximum allowed size.
    #[error("File too large: {size} bytes exceeds maximum of {max} bytes")]
    TooLarge {
        /// Actual size in bytes
        size: usize,
        /// Maximum allowed size in bytes
        max: usize,
    },

    /// Folders are nested deeper than allowed.
    #[error("Folders nested too deeply: {depth} levels exceeds maximum of {max}")]
    TooDeep {
        /// Deepest folder level found
        depth: usize,
        /// Maximum allowed depth
        max: usize,
    },

    /// The collection holds too many folders and requests.
    #[error("Too many items: {count} exceeds maximum of {max}")]
    TooManyItems {
        /// Actual item count
        count: usize,
        /// Maximum allowed items
        max: usize,
    },

    /// The file could not be read.
    #[error("Could not read import file: {0}")]
    Io(#[from] FileSystemError),
}

/// Result type alias for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// A normalized collection plus the issues met on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// The canonical collection.
    pub collection: Collection,
    /// Non-fatal issues.
    pub warnings: Vec<ImportWarning>,
}

impl Normalized {
    pub(crate) const fn new(collection: Collection, warnings: Vec<ImportWarning>) -> Self {
        Self {
            collection,
            warnings,
        }
    }
}

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// The detected format.
    pub kind: FormatKind,
    /// The canonical collection, ready to be inserted and stored.
    pub collection: Collection,
    /// Non-fatal issues met while normalizing.
    pub warnings: Vec<ImportWarning>,
}

impl ImportOutcome {
    /// Warning counts per severity.
    #[must_use]
    pub fn stats(&self) -> WarningStats {
        self.warnings.iter().collect()
    }
}

/// One entry of the detection table.
struct Capability {
    kind: FormatKind,
    detect: fn(&Value) -> bool,
}

/// Probes in priority order.
const CAPABILITIES: [Capability; 3] = [
    Capability {
        kind: FormatKind::OpenApi,
        detect: is_openapi,
    },
    Capability {
        kind: FormatKind::Raml,
        detect: is_raml,
    },
    Capability {
        kind: FormatKind::Postman,
        detect: is_postman,
    },
];

/// Relaxed probes applied to YAML files that failed the strict ones.
const RELAXED_YAML: [Capability; 2] = [
    Capability {
        kind: FormatKind::OpenApi,
        detect: has_openapi_version,
    },
    Capability {
        kind: FormatKind::Raml,
        detect: is_raml_relaxed,
    },
];

fn has_openapi_version(doc: &Value) -> bool {
    str_field(doc, "openapi").is_some_and(|v| v.starts_with("3."))
}

fn is_openapi(doc: &Value) -> bool {
    has_openapi_version(doc) && doc.get("paths").is_some()
}

fn is_raml(doc: &Value) -> bool {
    is_raml_relaxed(doc) && doc.get("version").is_some()
}

fn is_raml_relaxed(doc: &Value) -> bool {
    doc.get("title").is_some() && doc.get("baseUri").is_some()
}

fn is_postman(doc: &Value) -> bool {
    doc.pointer("/info/schema")
        .and_then(Value::as_str)
        .is_some_and(|schema| schema.contains(POSTMAN_SCHEMA_MARKER))
}

fn extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Classifies a document.
///
/// A `.graphql` extension wins regardless of content. Otherwise the text is
/// read as JSON or YAML and probed for `OpenAPI`, RAML and Postman in that
/// order. YAML files (`.yaml`, `.yml`, `.raml`) get a second, relaxed pass.
///
/// # Errors
///
/// Returns `UnsupportedFormat` when nothing matches.
pub fn detect(raw: &str, file_name: &str) -> ImportResult<FormatKind> {
    let ext = extension(file_name);
    if ext == "graphql" || ext == "gql" {
        return Ok(FormatKind::GraphQl);
    }

    let document = parse_document(raw).map_err(ImportError::UnsupportedFormat)?;
    if let Some(capability) = CAPABILITIES.iter().find(|c| (c.detect)(&document)) {
        return Ok(capability.kind);
    }

    if matches!(ext.as_str(), "yaml" | "yml" | "raml")
        && let Ok(yaml) = parse_yaml(raw)
        && let Some(capability) = RELAXED_YAML.iter().find(|c| (c.detect)(&yaml))
    {
        return Ok(capability.kind);
    }

    Err(ImportError::UnsupportedFormat(format!(
        "{} is not an OpenAPI 3, RAML, Postman or GraphQL document",
        if file_name.is_empty() { "input" } else { file_name }
    )))
}

/// Normalizes a document of a known kind.
///
/// # Errors
///
/// Returns `Malformed` with the parser's message when the text cannot be
/// turned into a collection.
pub fn parse(raw: &str, kind: FormatKind) -> ImportResult<Normalized> {
    let malformed = |cause: String| ImportError::Malformed { kind, cause };
    match kind {
        FormatKind::GraphQl => Ok(graphql::normalize(raw)),
        FormatKind::OpenApi => {
            let document = parse_document(raw).map_err(malformed)?;
            openapi::normalize(&document).map_err(malformed)
        }
        FormatKind::Raml => {
            let document = parse_document(raw).map_err(malformed)?;
            raml::normalize(&document).map_err(malformed)
        }
        FormatKind::Postman => {
            let document = parse_document(raw).map_err(malformed)?;
            postman::normalize(document).map_err(malformed)
        }
    }
}

/// Detects, parses and checks a document.
///
/// # Errors
///
/// Returns `TooLarge` before any parsing, the detection or parse error,
/// or `TooDeep` / `TooManyItems` when the result exceeds the limits.
pub fn import_document(
    raw: &str,
    file_name: &str,
    config: &ImportConfig,
) -> ImportResult<ImportOutcome> {
    if raw.len() > config.max_file_size {
        return Err(ImportError::TooLarge {
            size: raw.len(),
            max: config.max_file_size,
        });
    }

    let kind = detect(raw, file_name)?;
    let Normalized {
        collection,
        warnings,
    } = parse(raw, kind)?;
    check_limits(&collection, config)?;

    let outcome = ImportOutcome {
        kind,
        collection,
        warnings,
    };
    let stats = outcome.stats();
    tracing::info!(
        %kind,
        collection = %outcome.collection.name,
        requests = outcome.collection.request_count(),
        folders = outcome.collection.folder_count(),
        info = stats.info,
        warnings = stats.warnings,
        errors = stats.errors,
        "document imported"
    );
    Ok(outcome)
}

/// Reads a file through the file-system port and imports it.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, otherwise as [`import_document`].
pub async fn import_file<F: FileSystem>(
    fs: &F,
    path: &Path,
    config: &ImportConfig,
) -> ImportResult<ImportOutcome> {
    let raw = fs.read_file_string(path).await?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    import_document(&raw, file_name, config)
}

fn check_limits(collection: &Collection, config: &ImportConfig) -> ImportResult<()> {
    let count = collection.request_count() + collection.folder_count();
    if count > config.max_items {
        return Err(ImportError::TooManyItems {
            count,
            max: config.max_items,
        });
    }

    let depth = max_depth(&collection.folders);
    if depth > config.max_depth {
        return Err(ImportError::TooDeep {
            depth,
            max: config.max_depth,
        });
    }
    Ok(())
}

fn max_depth(folders: &[Folder]) -> usize {
    folders
        .iter()
        .map(|folder| 1 + max_depth(&folder.folders))
        .max()
        .unwrap_or(0)
}
