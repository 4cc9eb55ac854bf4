//! Workbench Application - Use cases and ports
//!
//! Sits between the pure domain model and the adapters: variable
//! substitution, request preparation, the collection runner and the
//! write-through edit use case. I/O happens only through the traits in
//! [`ports`].

pub mod auth;
pub mod dispatch;
pub mod error;
pub mod ports;
pub mod runner;
pub mod use_cases;
pub mod variable_resolver;

pub use dispatch::{effective_auth, prepare_request, validate_url};
pub use error::{ApplicationError, ApplicationResult};
pub use runner::{
    CollectionRunner, RunRecord, RunState, RunSummary, RunnerConfig, StopHandle,
};
pub use use_cases::{EditCollection, TreeEdit};
pub use variable_resolver::{GeneratorConfig, GeneratorConfigMap, SubstitutionEngine};
