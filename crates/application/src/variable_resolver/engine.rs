//! Substitution engine
//!
//! Materializes a request for sending. Dynamic variables are generated first,
//! then `{{name}}` references are replaced with the `currentValue` of the
//! matching selected collection variable. Anything unresolved is left as it
//! was written.

use serde_json::Value;
use workbench_domain::{RawLanguage, Request, RequestBody, Variable};

use super::dynamic::{DynamicVariables, GeneratorConfigMap, SubstitutionError};
use super::parser::{extract_variable_names, has_tokens, parse_dynamic_tokens, parse_variables};

/// Applies dynamic and collection variables to requests.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionEngine {
    configs: GeneratorConfigMap,
}

impl SubstitutionEngine {
    /// Creates an engine using the given generator constraints.
    #[must_use]
    pub const fn new(configs: GeneratorConfigMap) -> Self {
        Self { configs }
    }

    /// Returns the generator constraints in use.
    #[must_use]
    pub const fn configs(&self) -> &GeneratorConfigMap {
        &self.configs
    }

    /// Returns a substituted copy of the request.
    ///
    /// Covers the URL, header and query keys and values, the body payload and
    /// the auth credentials. The input is left untouched.
    #[must_use]
    pub fn substitute(&self, request: &Request, variables: &[Variable]) -> Request {
        let mut out = request.clone();
        let apply = |s: &str| self.substitute_str(s, variables);

        out.url = apply(&out.url);
        for pair in out.headers.iter_mut().chain(out.query_params.iter_mut()) {
            pair.key = apply(&pair.key);
            pair.value = apply(&pair.value);
        }

        match &mut out.body {
            RequestBody::None | RequestBody::File(_) => {}
            RequestBody::Raw { content, language } => {
                *content = if RawLanguage::effective(*language) == RawLanguage::Json {
                    self.substitute_json_text(content, variables)
                } else {
                    apply(content)
                };
            }
            RequestBody::FormData { items } => {
                for item in items {
                    item.key = apply(&item.key);
                    item.value = apply(&item.value);
                }
            }
            RequestBody::UrlEncoded { items } => {
                for item in items {
                    item.key = apply(&item.key);
                    item.value = apply(&item.value);
                }
            }
            RequestBody::GraphQl { query, variables: vars } => {
                *query = apply(query);
                *vars = self.substitute_json_text(vars, variables);
            }
        }

        for field in out.auth.strings_mut() {
            *field = apply(field);
        }

        out
    }

    /// Applies both passes to a single string.
    #[must_use]
    pub fn substitute_str(&self, input: &str, variables: &[Variable]) -> String {
        if !has_tokens(input) {
            return input.to_string();
        }
        let generated = self.substitute_dynamic(input);
        substitute_variables(&generated, variables)
    }

    /// Replaces every known dynamic token with a freshly generated value.
    ///
    /// Each occurrence is generated independently. Unknown names and failed
    /// generators leave the token verbatim.
    #[must_use]
    pub fn substitute_dynamic(&self, input: &str) -> String {
        let tokens = parse_dynamic_tokens(input);
        if tokens.is_empty() {
            return input.to_string();
        }

        let mut result = String::with_capacity(input.len());
        let mut last_end = 0;
        for token in tokens {
            result.push_str(&input[last_end..token.span.start]);
            match DynamicVariables::generate(&token.name, &self.configs) {
                Ok(value) => result.push_str(&value),
                Err(SubstitutionError::Unknown(_)) => result.push_str(&input[token.span.clone()]),
                Err(error) => {
                    tracing::warn!(variable = %token.name, %error, "dynamic variable left unresolved");
                    result.push_str(&input[token.span.clone()]);
                }
            }
            last_end = token.span.end;
        }
        result.push_str(&input[last_end..]);
        result
    }

    /// Substitutes inside a JSON document leaf by leaf.
    ///
    /// Non-string values keep their type. Text that is not valid JSON is
    /// substituted as a whole string, and a document without any
    /// replacement keeps its original formatting.
    #[must_use]
    pub fn substitute_json_text(&self, text: &str, variables: &[Variable]) -> String {
        if !has_tokens(text) {
            return text.to_string();
        }
        let Ok(parsed) = serde_json::from_str::<Value>(text) else {
            return self.substitute_str(text, variables);
        };

        let substituted = self.substitute_json(&parsed, variables);
        if substituted == parsed {
            return text.to_string();
        }
        let rendered = if text.contains('\n') {
            serde_json::to_string_pretty(&substituted)
        } else {
            serde_json::to_string(&substituted)
        };
        rendered.unwrap_or_else(|_| self.substitute_str(text, variables))
    }

    /// Substitutes every string leaf of a JSON value.
    #[must_use]
    pub fn substitute_json(&self, value: &Value, variables: &[Variable]) -> Value {
        match value {
            Value::String(s) => Value::String(self.substitute_str(s, variables)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.substitute_json(item, variables))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.substitute_json(v, variables)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

/// Replaces `{{name}}` references with selected variables' current values.
///
/// Dynamic references (`{{$name}}`) and unknown names are left verbatim.
#[must_use]
pub fn substitute_variables(input: &str, variables: &[Variable]) -> String {
    let references = parse_variables(input);
    if references.is_empty() {
        return input.to_string();
    }

    let mut result = String::with_capacity(input.len());
    let mut last_end = 0;
    for reference in references {
        result.push_str(&input[last_end..reference.span.start]);
        let value = (!reference.is_builtin)
            .then(|| lookup(variables, &reference.name))
            .flatten();
        match value {
            Some(value) => result.push_str(value),
            None => result.push_str(&input[reference.span.clone()]),
        }
        last_end = reference.span.end;
    }
    result.push_str(&input[last_end..]);
    result
}

/// A selected variable with an empty current value counts as unset.
fn lookup<'a>(variables: &'a [Variable], name: &str) -> Option<&'a str> {
    variables
        .iter()
        .find(|v| v.is_selected && v.name == name)
        .map(|v| v.current_value.as_str())
        .filter(|value| !value.is_empty())
}

/// Returns the distinct collection variable names a request references, in
/// order of first appearance.
#[must_use]
pub fn extract_variable_references(request: &Request) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for text in request_strings(request) {
        for name in extract_variable_names(text) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Returns the referenced names that no selected variable provides.
#[must_use]
pub fn missing_variables(request: &Request, variables: &[Variable]) -> Vec<String> {
    extract_variable_references(request)
        .into_iter()
        .filter(|name| lookup(variables, name).is_none())
        .collect()
}

fn request_strings(request: &Request) -> Vec<&str> {
    let mut strings = vec![request.url.as_str()];
    for pair in request.headers.iter().chain(&request.query_params) {
        strings.push(&pair.key);
        strings.push(&pair.value);
    }
    match &request.body {
        RequestBody::None | RequestBody::File(_) => {}
        RequestBody::Raw { content, .. } => strings.push(content),
        RequestBody::FormData { items } => {
            for item in items {
                strings.push(&item.key);
                strings.push(&item.value);
            }
        }
        RequestBody::UrlEncoded { items } => {
            for item in items {
                strings.push(&item.key);
                strings.push(&item.value);
            }
        }
        RequestBody::GraphQl { query, variables } => {
            strings.push(query);
            strings.push(variables);
        }
    }
    strings.extend(request.auth.strings());
    strings
}
