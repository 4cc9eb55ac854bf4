//! Variable substitution
//!
//! Expands dynamic variables (`$name`, `{$name}`, `{{$name}}`) and collection
//! variables (`{{name}}`) inside requests.
//!
//! # Usage
//!
//! ```
//! use workbench_application::variable_resolver::SubstitutionEngine;
//! use workbench_domain::{HttpMethod, Request, Variable};
//!
//! let variables = vec![Variable::new("base", "https://api.test")];
//! let request = Request::new("List users").with_target(HttpMethod::Get, "{{base}}/users");
//!
//! let ready = SubstitutionEngine::default().substitute(&request, &variables);
//! assert_eq!(ready.url, "https://api.test/users");
//! ```

pub mod dynamic;
pub mod engine;
pub mod parser;

pub use dynamic::{
    DynamicInfo, DynamicVariables, GeneratorConfig, GeneratorConfigMap, SubstitutionError,
    SubstitutionResult, dynamic_variable_names,
};
pub use engine::{
    SubstitutionEngine, extract_variable_references, missing_variables, substitute_variables,
};
pub use parser::{
    DynamicToken, VariableReference, extract_variable_names, has_tokens, parse_dynamic_tokens,
    parse_variables,
};
