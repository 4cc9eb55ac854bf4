//! Application use cases (business logic orchestration).

mod edit_collection;

pub use edit_collection::{EditCollection, TreeEdit};
