//! RAML → canonical mapping
//!
//! Resources are the `/`-prefixed keys, nested arbitrarily deep. Every
//! method under a resource becomes one request named `"<METHOD> <path>"`;
//! requests are grouped into folders by their first path segment.

use serde_json::{Map, Value, json};
use workbench_domain::{
    Collection, Folder, FormDataItem, Header, HttpMethod, QueryParam, RawLanguage, Request,
    RequestBody, ResponseEntry, Variable,
};

use super::document::{example_text, scalar_text, str_field, template_path};
use super::importer::Normalized;
use super::warning::ImportWarning;

const DEFAULT_TITLE: &str = "API Collection";
const MULTIPART_MEDIA: &str = "multipart/form-data";

/// Type references are followed at most this deep.
const MAX_TYPE_DEPTH: usize = 5;

/// Maps a RAML document into a collection.
///
/// # Errors
///
/// Returns a message when the document root is not a mapping.
pub fn normalize(document: &Value) -> Result<Normalized, String> {
    let Some(root) = document.as_object() else {
        return Err("RAML document root must be a mapping".to_string());
    };

    let title = root
        .get("title")
        .map(scalar_text)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let version = root.get("version").map(scalar_text).unwrap_or_default();
    let base_uri = root
        .get("baseUri")
        .map(scalar_text)
        .unwrap_or_default()
        .replace("{version}", &version);

    let mut collection = Collection::new(format!("{title} {version}").trim())
        .with_description(format!("Generated from RAML specification: {title}"))
        .with_variable(Variable::new("baseUrl", base_uri));

    let empty = Map::new();
    let walker = Walker {
        types: root.get("types").and_then(Value::as_object).unwrap_or(&empty),
    };
    let mut warnings = Vec::new();
    let mut requests = Vec::new();
    for (key, resource) in root {
        if key.starts_with('/') {
            walker.resource("", key, resource, &mut requests, &mut warnings);
        }
    }

    let mut folders: Vec<(String, Folder)> = Vec::new();
    for (path, request) in requests {
        let segment = path
            .trim_matches('/')
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();
        match folders.iter_mut().find(|(s, _)| *s == segment) {
            Some((_, folder)) => folder.requests.push(request),
            None => {
                let folder = Folder::new(folder_title(&segment)).with_request(request);
                folders.push((segment, folder));
            }
        }
    }
    collection.folders = folders.into_iter().map(|(_, folder)| folder).collect();

    Ok(Normalized::new(collection, warnings))
}

struct Walker<'a> {
    types: &'a Map<String, Value>,
}

impl Walker<'_> {
    fn resource(
        &self,
        parent: &str,
        key: &str,
        resource: &Value,
        out: &mut Vec<(String, Request)>,
        warnings: &mut Vec<ImportWarning>,
    ) {
        let path = format!("{parent}{key}");
        let Some(entries) = resource.as_object() else {
            if !resource.is_null() {
                warnings.push(ImportWarning::warning(&path, "resource is not a mapping; skipped"));
            }
            return;
        };

        for (name, definition) in entries {
            if let Some(method) = HttpMethod::from_operation_key(&name.to_ascii_lowercase()) {
                out.push((path.clone(), self.request(&path, method, definition)));
            }
        }
        for (name, nested) in entries {
            if name.starts_with('/') {
                self.resource(&path, name, nested, out, warnings);
            }
        }
    }

    fn request(&self, path: &str, method: HttpMethod, definition: &Value) -> Request {
        let mut request = Request::new(format!("{method} {path}"))
            .with_target(method, format!("{{{{baseUrl}}}}{}", template_path(path)));
        request.description = str_field(definition, "description").map(str::to_string);
        request.query_params = parameters(definition.get("queryParameters"));
        request.headers = parameters(definition.get("headers"));

        if let Some((media, spec)) = definition
            .get("body")
            .and_then(Value::as_object)
            .and_then(|body| body.iter().next())
        {
            request.body = if media.contains(MULTIPART_MEDIA) {
                form_body(spec)
            } else {
                let example = self.body_example(spec);
                let language = if media.contains("json") {
                    RawLanguage::Json
                } else {
                    RawLanguage::Text
                };
                RequestBody::raw(
                    example.map_or_else(|| "{}".to_string(), |e| example_text(&e)),
                    language,
                )
            };
            if !request
                .headers
                .iter()
                .any(|h| h.key.eq_ignore_ascii_case("content-type"))
            {
                request.headers.push(Header::new("Content-Type", media));
            }
            request.content_type.clone_from(media);
        }

        if let Some(responses) = definition.get("responses").and_then(Value::as_object) {
            for (code, response) in responses {
                if let Ok(code) = code.parse::<u16>() {
                    request.push_response(self.response(code, response));
                }
            }
        }

        request
    }

    fn body_example(&self, spec: &Value) -> Option<Value> {
        let example = if let Some(type_def) = spec.get("type") {
            self.type_example(type_def, 0)
        } else if let Some(properties) = spec.get("properties") {
            self.type_example(properties, 0)
        } else {
            spec.get("example").cloned()
        };
        example.filter(is_present)
    }

    fn response(&self, code: u16, response: &Value) -> ResponseEntry {
        let body = response
            .get("body")
            .and_then(Value::as_object)
            .and_then(|body| body.values().next())
            .and_then(|spec| spec.get("type"))
            .and_then(|type_def| self.type_example(type_def, 0))
            .filter(is_present)
            .map(|example| example_text(&example))
            .unwrap_or_default();
        ResponseEntry::now(
            code,
            str_field(response, "description").unwrap_or_default(),
            body,
        )
    }

    /// Builds a placeholder value from a type name or an inline property map.
    fn type_example(&self, type_def: &Value, depth: usize) -> Option<Value> {
        if depth > MAX_TYPE_DEPTH {
            return None;
        }
        match type_def {
            Value::String(name) => {
                if let Some(declared) = self.types.get(name) {
                    if let Some(example) = declared.get("example") {
                        return Some(example.clone());
                    }
                    if let Some(properties) = declared.get("properties") {
                        return self.type_example(properties, depth + 1);
                    }
                    if let Some(inner) = declared.get("type") {
                        return self.type_example(inner, depth + 1);
                    }
                }
                if let Some(element) = name.strip_suffix("[]") {
                    let element = self.type_example(&Value::String(element.to_string()), depth + 1);
                    return Some(Value::Array(element.filter(is_present).into_iter().collect()));
                }
                Some(primitive_example(name))
            }
            Value::Object(properties) => {
                let mut example = Map::new();
                for (name, property) in properties {
                    let inner = property.get("type").unwrap_or(property);
                    let value = property
                        .get("example")
                        .cloned()
                        .or_else(|| self.type_example(inner, depth + 1))
                        .unwrap_or(Value::Null);
                    example.insert(name.clone(), value);
                }
                Some(Value::Object(example))
            }
            _ => None,
        }
    }
}

fn primitive_example(name: &str) -> Value {
    match name {
        "string" => json!("example string"),
        "integer" => json!(123),
        "number" => json!(123.45),
        "boolean" => json!(true),
        "datetime" => json!("2024-01-01T12:00:00Z"),
        "date" | "date-only" => json!("2024-01-01"),
        "array" => json!([]),
        "object" => json!({}),
        "file" => json!("file.txt"),
        other => json!(format!("example_{other}")),
    }
}

/// Empty containers and `null` count as "no example".
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn parameters(declared: Option<&Value>) -> Vec<QueryParam> {
    let Some(declared) = declared.and_then(Value::as_object) else {
        return Vec::new();
    };
    declared
        .iter()
        .map(|(key, definition)| {
            let value = definition
                .get("example")
                .or_else(|| definition.get("default"))
                .map(scalar_text)
                .unwrap_or_default();
            let mut param = if definition.get("required") == Some(&Value::Bool(false)) {
                QueryParam::unselected(key, value)
            } else {
                QueryParam::new(key, value)
            };
            param.description = str_field(definition, "description").map(str::to_string);
            param
        })
        .collect()
}

fn form_body(spec: &Value) -> RequestBody {
    let items = spec
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| {
            properties
                .iter()
                .map(|(key, property)| {
                    let kind = property.as_str().or_else(|| str_field(property, "type"));
                    if kind == Some("file") {
                        FormDataItem::file(key, "")
                    } else {
                        FormDataItem::text(key, "")
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    RequestBody::FormData { items }
}

/// `user-accounts` → `User Accounts`.
fn folder_title(segment: &str) -> String {
    segment
        .replace(['-', '_'], " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
