//! Deterministic JSON for stored snapshots and exports.
//!
//! Output is stable across runs so that files diff cleanly:
//! - field order follows the type definitions
//! - 2-space indentation
//! - trailing newline

mod json;

pub use json::*;
