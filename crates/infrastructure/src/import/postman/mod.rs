//! Postman Collection v2.1 support
//!
//! The same wire types back both directions: [`normalize`] maps a Postman
//! document into the canonical model and the exporter projects the
//! canonical model back into these types.

pub mod mapper;
pub mod types;

pub use mapper::map_collection;
pub use types::{POSTMAN_SCHEMA_V21, PostmanCollection};

use serde_json::Value;

use super::importer::Normalized;

/// Maps a Postman document into a collection.
///
/// # Errors
///
/// Returns the deserializer message when the document does not have the
/// Postman collection shape.
pub fn normalize(document: Value) -> Result<Normalized, String> {
    let postman: PostmanCollection = serde_json::from_value(document).map_err(|e| e.to_string())?;
    let (collection, warnings) = map_collection(&postman);
    Ok(Normalized::new(collection, warnings))
}
