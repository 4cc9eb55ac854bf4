//! Generic document loading
//!
//! Every structured format is first read into a `serde_json::Value`: JSON
//! when the text parses as JSON, YAML otherwise. YAML-only constructs are
//! folded into JSON shapes (non-string keys become strings, tags are dropped).

use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;

/// Parses text as JSON, falling back to YAML.
///
/// # Errors
///
/// Returns the YAML parser message when neither format accepts the text.
pub fn parse_document(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).or_else(|_| parse_yaml(raw))
}

/// Parses text as YAML only.
///
/// # Errors
///
/// Returns the YAML parser message.
pub fn parse_yaml(raw: &str) -> Result<Value, String> {
    serde_yaml::from_str::<Yaml>(raw)
        .map(yaml_to_json)
        .map_err(|e| e.to_string())
}

fn yaml_to_json(value: Yaml) -> Value {
    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                object.insert(key_to_string(key), yaml_to_json(value));
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn key_to_string(key: Yaml) -> String {
    match key {
        Yaml::String(s) => s,
        Yaml::Null => "null".to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Renders a scalar the way it would be typed into a form field.
///
/// Strings are returned as-is, `null` becomes empty, and anything else is
/// written as compact JSON.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders an example payload as body text.
///
/// String examples are used verbatim; structured ones are pretty-printed.
pub fn example_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Returns the string field `key` of an object, if present.
pub fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Rewrites `{param}` path templates into `{{param}}` variable tokens.
///
/// Existing `{{name}}` tokens are left alone.
pub fn template_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 8);
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        if after.starts_with("{{") {
            let end = after.find("}}").map_or(after.len(), |i| i + 2);
            out.push_str(&after[..end]);
            rest = &after[end..];
            continue;
        }
        match after.find('}') {
            Some(close) if close > 1 => {
                out.push_str("{{");
                out.push_str(after[1..close].trim());
                out.push_str("}}");
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = &after[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
