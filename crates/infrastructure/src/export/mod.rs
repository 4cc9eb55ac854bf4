//! Export infrastructure.
//!
//! Collections are exported as Postman Collection v2.1 documents.

mod postman;

pub use postman::{export_collection, export_collection_json};
