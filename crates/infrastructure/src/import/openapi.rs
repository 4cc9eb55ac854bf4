//! `OpenAPI` 3 → canonical mapping
//!
//! One request per (path, method) pair. Operations are grouped into folders
//! by their first tag; untagged operations stay at the top level. Local
//! `$ref`s (`#/components/...`) are followed for parameters, request bodies
//! and schemas.

use serde_json::{Map, Value, json};
use workbench_domain::{
    Collection, Folder, FormDataItem, Header, HttpMethod, QueryParam, Request, RequestBody,
    UrlEncodedItem, Variable,
};

use super::document::{example_text, scalar_text, str_field, template_path};
use super::importer::Normalized;
use super::warning::{ImportWarning, child_path};

const DEFAULT_NAME: &str = "Imported OpenAPI";
const JSON_MEDIA: &str = "application/json";
const FORM_MEDIA: &str = "application/x-www-form-urlencoded";
const MULTIPART_MEDIA: &str = "multipart/form-data";

/// Path-item keys that are not operations.
const PATH_ITEM_FIELDS: [&str; 5] = ["parameters", "summary", "description", "servers", "$ref"];

/// Maps an `OpenAPI` document into a collection.
///
/// # Errors
///
/// Returns a message when `paths` is present but not an object.
pub fn normalize(document: &Value) -> Result<Normalized, String> {
    let paths = match document.get("paths") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(paths)) => paths.clone(),
        Some(_) => return Err("`paths` must be an object".to_string()),
    };

    let name = document
        .pointer("/info/title")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_NAME);
    let mut collection = Collection::new(name);
    collection.description = document
        .pointer("/info/description")
        .and_then(Value::as_str)
        .map(str::to_string);
    if let Some(server) = document.pointer("/servers/0/url").and_then(Value::as_str) {
        collection.variables.push(Variable::new("baseUrl", server));
    }

    let mut warnings = Vec::new();
    let mut grouped: Vec<(String, Vec<Request>)> = Vec::new();

    for (path, item) in &paths {
        let item = resolve(document, item);
        let Some(operations) = item.as_object() else {
            warnings.push(ImportWarning::warning(path, "path item is not an object; skipped"));
            continue;
        };
        let shared = parameter_list(document, item.get("parameters"));

        for (key, operation) in operations {
            if PATH_ITEM_FIELDS.contains(&key.as_str()) {
                continue;
            }
            let Some(method) = HttpMethod::from_operation_key(key) else {
                if key == "trace" {
                    warnings.push(ImportWarning::warning(
                        path,
                        format!("operation {key} is not supported; skipped"),
                    ));
                }
                continue;
            };

            let request = map_operation(document, path, method, operation, &shared, &mut warnings);
            let tag = operation
                .pointer("/tags/0")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            match grouped.iter_mut().find(|(t, _)| *t == tag) {
                Some((_, requests)) => requests.push(request),
                None => grouped.push((tag, vec![request])),
            }
        }
    }

    for (tag, requests) in grouped {
        if tag.is_empty() {
            collection.requests.extend(requests);
        } else {
            let mut folder = Folder::new(tag);
            folder.requests = requests;
            collection.folders.push(folder);
        }
    }

    Ok(Normalized::new(collection, warnings))
}

fn map_operation(
    document: &Value,
    path: &str,
    method: HttpMethod,
    operation: &Value,
    shared: &[Value],
    warnings: &mut Vec<ImportWarning>,
) -> Request {
    let name = str_field(operation, "summary")
        .filter(|s| !s.trim().is_empty())
        .map_or_else(|| format!("{method} {path}"), str::to_string);
    let location = child_path(path, &name);

    let mut request = Request::new(&name)
        .with_target(method, format!("{{{{baseUrl}}}}{}", template_path(path)));
    request.description = str_field(operation, "description").map(str::to_string);

    let own = parameter_list(document, operation.get("parameters"));
    for parameter in merge_parameters(shared, &own) {
        let Some(key) = str_field(&parameter, "name") else {
            continue;
        };
        match str_field(&parameter, "in") {
            Some("header") => request
                .headers
                .push(Header::new(key, parameter_value(&parameter))),
            Some("query") => request
                .query_params
                .push(QueryParam::new(key, parameter_value(&parameter))),
            _ => {}
        }
    }

    if let Some(body) = operation.get("requestBody") {
        let body = resolve(document, body);
        if let Some(content) = body.get("content").and_then(Value::as_object) {
            if let Some(first) = content.keys().next() {
                request.content_type.clone_from(first);
            }
            request.body = map_content(document, content);
            if request.body.is_none() && !content.is_empty() {
                warnings.push(ImportWarning::info(
                    location,
                    format!("no example body for {}", request.content_type),
                ));
            }
        }
    }

    request
}

fn map_content(document: &Value, content: &Map<String, Value>) -> RequestBody {
    if let Some(media) = content.get(JSON_MEDIA) {
        let example = media_example(document, media).unwrap_or_else(|| json!({}));
        return RequestBody::json(example_text(&example));
    }
    if let Some(media) = content.get(FORM_MEDIA) {
        return RequestBody::UrlEncoded {
            items: schema_properties(document, media)
                .into_iter()
                .map(|(key, property)| UrlEncodedItem::new(key, property_example(&property)))
                .collect(),
        };
    }
    if let Some(media) = content.get(MULTIPART_MEDIA) {
        return RequestBody::FormData {
            items: schema_properties(document, media)
                .into_iter()
                .map(|(key, property)| {
                    if str_field(&property, "format") == Some("binary") {
                        FormDataItem::file(key, "")
                    } else {
                        FormDataItem::text(key, property_example(&property))
                    }
                })
                .collect(),
        };
    }
    RequestBody::None
}

/// Example from `example`, `examples` (array or map) or `schema.example`.
fn media_example(document: &Value, media: &Value) -> Option<Value> {
    if let Some(example) = media.get("example") {
        return Some(example.clone());
    }
    let first = match media.get("examples") {
        Some(Value::Array(items)) => items.first(),
        Some(Value::Object(named)) => named.values().next(),
        _ => None,
    };
    if let Some(first) = first {
        let first = resolve(document, first);
        return Some(first.get("value").unwrap_or(first).clone());
    }
    media
        .get("schema")
        .map(|schema| resolve(document, schema))
        .and_then(|schema| schema.get("example"))
        .cloned()
}

fn schema_properties(document: &Value, media: &Value) -> Vec<(String, Value)> {
    media
        .get("schema")
        .map(|schema| resolve(document, schema))
        .and_then(|schema| schema.get("properties"))
        .and_then(Value::as_object)
        .map(|properties| {
            properties
                .iter()
                .map(|(key, property)| (key.clone(), resolve(document, property).clone()))
                .collect()
        })
        .unwrap_or_default()
}

fn property_example(property: &Value) -> String {
    property
        .get("example")
        .or_else(|| property.get("default"))
        .map(scalar_text)
        .unwrap_or_default()
}

fn parameter_list(document: &Value, parameters: Option<&Value>) -> Vec<Value> {
    parameters
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|p| resolve(document, p).clone()).collect())
        .unwrap_or_default()
}

/// Path-level parameters overridden by operation parameters with the same
/// name and location.
fn merge_parameters(shared: &[Value], own: &[Value]) -> Vec<Value> {
    fn identity(p: &Value) -> (Option<&str>, Option<&str>) {
        (str_field(p, "name"), str_field(p, "in"))
    }
    let mut merged: Vec<Value> = shared
        .iter()
        .filter(|s| !own.iter().any(|o| identity(o) == identity(s)))
        .cloned()
        .collect();
    merged.extend(own.iter().cloned());
    merged
}

fn parameter_value(parameter: &Value) -> String {
    parameter
        .get("example")
        .or_else(|| parameter.pointer("/schema/example"))
        .or_else(|| parameter.get("default"))
        .or_else(|| parameter.pointer("/schema/default"))
        .map(scalar_text)
        .unwrap_or_default()
}

/// Follows a local `$ref`, returning the value itself when there is none or
/// the target is missing.
fn resolve<'a>(document: &'a Value, value: &'a Value) -> &'a Value {
    let mut current = value;
    for _ in 0..8 {
        let Some(pointer) = str_field(current, "$ref").and_then(|r| r.strip_prefix('#')) else {
            break;
        };
        match document.pointer(pointer) {
            Some(target) => current = target,
            None => break,
        }
    }
    current
}
