//! Postman Collection v2.1 Type Definitions
//!
//! These types are read by the importer and written by the exporter.
//! Reading is lenient (`#[serde(default)]` nearly everywhere, loosely typed
//! values kept as `serde_json::Value`); writing skips empty optional fields
//! so exports stay close to what Postman itself produces.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::import::document::scalar_text;

/// Schema URL written into exported collections.
pub const POSTMAN_SCHEMA_V21: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

const fn is_false(value: &bool) -> bool {
    !*value
}

/// Root structure for Postman Collection v2.1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanCollection {
    pub info: PostmanInfo,
    #[serde(default)]
    pub item: Vec<PostmanItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<PostmanAuth>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variable: Vec<PostmanVariable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event: Vec<Value>,
}

/// Collection metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanInfo {
    #[serde(rename = "_postman_id", default, skip_serializing_if = "Option::is_none")]
    pub postman_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<PostmanDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

/// A description is either plain text or `{content, type}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostmanDescription {
    Text(String),
    Rich {
        #[serde(default)]
        content: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
}

impl PostmanDescription {
    /// The description text, or `None` when blank.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let text = match self {
            Self::Text(text) | Self::Rich { content: text, .. } => text,
        };
        (!text.trim().is_empty()).then(|| text.clone())
    }
}

fn description_text(description: Option<&PostmanDescription>) -> Option<String> {
    description.and_then(PostmanDescription::text)
}

/// An item can be either a folder (containing more items) or a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanItem {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<PostmanDescription>,
    /// If present, this item is a folder containing sub-items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Vec<Self>>,
    /// If present, this item is a request
    #[serde(
        default,
        deserialize_with = "request_or_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub request: Option<PostmanRequest>,
    /// Saved responses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response: Vec<Value>,
    /// Scripts attached to this item
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event: Vec<Value>,
    /// Folder-level auth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<PostmanAuth>,
}

impl PostmanItem {
    /// Returns true if this item is a folder (has sub-items)
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        self.item.is_some()
    }

    /// Returns true if this item is a request
    #[must_use]
    pub const fn is_request(&self) -> bool {
        self.request.is_some()
    }

    /// The item's description, or `None` when blank.
    #[must_use]
    pub fn description_text(&self) -> Option<String> {
        description_text(self.description.as_ref())
    }
}

/// Postman Request definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanRequest {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default, deserialize_with = "header_list_or_text")]
    pub header: Vec<PostmanHeader>,
    #[serde(default)]
    pub url: PostmanUrl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<PostmanAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PostmanBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<PostmanDescription>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// `item.request` is either a request object or a bare URL.
#[derive(Deserialize)]
#[serde(untagged)]
enum RequestShape {
    Url(String),
    Full(Box<PostmanRequest>),
}

fn request_or_url<'de, D>(deserializer: D) -> Result<Option<PostmanRequest>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(
        Option::<RequestShape>::deserialize(deserializer)?.map(|shape| match shape {
            RequestShape::Url(url) => PostmanRequest {
                method: default_method(),
                header: Vec::new(),
                url: PostmanUrl::Simple(url),
                auth: None,
                body: None,
                description: None,
            },
            RequestShape::Full(request) => *request,
        }),
    )
}

/// `request.header` is either a list or a block of `Key: Value` lines.
#[derive(Deserialize)]
#[serde(untagged)]
enum HeaderShape {
    Text(String),
    List(Vec<PostmanHeader>),
}

fn header_list_or_text<'de, D>(deserializer: D) -> Result<Vec<PostmanHeader>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<HeaderShape>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(HeaderShape::List(headers)) => headers,
        Some(HeaderShape::Text(text)) => parse_header_lines(&text),
    })
}

fn parse_header_lines(text: &str) -> Vec<PostmanHeader> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| PostmanHeader {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
            header_type: None,
            description: None,
            disabled: false,
        })
        .collect()
}

impl PostmanRequest {
    /// The request's description, or `None` when blank.
    #[must_use]
    pub fn description_text(&self) -> Option<String> {
        description_text(self.description.as_ref())
    }
}

/// URL can be either a simple string or a structured object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum PostmanUrl {
    #[default]
    Empty,
    Simple(String),
    Structured(PostmanUrlStructured),
}

impl PostmanUrl {
    /// The URL as text: `raw` when present, else rebuilt from its parts.
    #[must_use]
    pub fn raw(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Simple(s) => s.clone(),
            Self::Structured(s) => match &s.raw {
                Some(raw) if !raw.is_empty() => raw.clone(),
                _ => s.rebuild(),
            },
        }
    }

    /// Get query parameters if available
    #[must_use]
    pub fn query_params(&self) -> &[PostmanQueryParam] {
        match self {
            Self::Structured(s) => &s.query,
            _ => &[],
        }
    }
}

/// Host or path written either as one string or as segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostmanSegments {
    Joined(String),
    Parts(Vec<String>),
}

impl Default for PostmanSegments {
    fn default() -> Self {
        Self::Parts(Vec::new())
    }
}

impl PostmanSegments {
    fn join(&self, separator: &str) -> String {
        match self {
            Self::Joined(s) => s.clone(),
            Self::Parts(parts) => parts.join(separator),
        }
    }

    fn is_empty_parts(&self) -> bool {
        matches!(self, Self::Parts(parts) if parts.is_empty())
    }
}

/// Structured URL object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PostmanUrlStructured {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default)]
    pub host: PostmanSegments,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "PostmanSegments::is_empty_parts")]
    pub path: PostmanSegments,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<PostmanQueryParam>,
}

impl PostmanUrlStructured {
    /// Builds `protocol://host[:port]/path?query` from the parts.
    fn rebuild(&self) -> String {
        let protocol = self.protocol.as_deref().unwrap_or("https");
        let mut url = format!("{protocol}://{}", self.host.join("."));
        if let Some(port) = &self.port {
            url.push(':');
            url.push_str(port);
        }
        url.push('/');
        url.push_str(self.path.join("/").trim_start_matches('/'));

        let query: Vec<String> = self
            .query
            .iter()
            .filter(|q| !q.disabled)
            .map(|q| format!("{}={}", q.key, q.value.as_deref().unwrap_or_default()))
            .collect();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }
}

/// Query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostmanQueryParam {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

/// Request header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostmanHeader {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub header_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

/// Request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanBody {
    #[serde(default)]
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urlencoded: Vec<PostmanFormParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formdata: Vec<PostmanFormDataParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PostmanBodyFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql: Option<PostmanGraphQL>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<PostmanBodyOptions>,
}

impl PostmanBody {
    /// An empty body of the given mode.
    #[must_use]
    pub fn mode(mode: &str) -> Self {
        Self {
            mode: mode.to_string(),
            raw: None,
            urlencoded: Vec::new(),
            formdata: Vec::new(),
            file: None,
            graphql: None,
            options: None,
        }
    }

    /// The raw language from `options.raw.language`, if declared.
    #[must_use]
    pub fn raw_language(&self) -> Option<&str> {
        self.options
            .as_ref()
            .and_then(|o| o.raw.as_ref())
            .and_then(|r| r.language.as_deref())
    }
}

/// Form URL-encoded parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostmanFormParam {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

/// Form-data parameter (supports file uploads)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanFormDataParam {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    /// A path, or a list of paths for multi-file fields.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub src: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

impl PostmanFormDataParam {
    /// The first source path, if any.
    #[must_use]
    pub fn src_path(&self) -> Option<String> {
        let path = match &self.src {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => items.iter().find_map(Value::as_str).map(str::to_string),
            _ => None,
        };
        path.filter(|p| !p.is_empty())
    }
}

/// Binary file body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostmanBodyFile {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// GraphQL body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostmanGraphQL {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub variables: Option<String>,
}

/// Body options (e.g., raw language)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostmanBodyOptions {
    #[serde(default)]
    pub raw: Option<PostmanRawOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostmanRawOptions {
    #[serde(default)]
    pub language: Option<String>,
}

/// Authentication configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanAuth {
    #[serde(rename = "type")]
    pub auth_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub basic: Vec<PostmanAuthParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bearer: Vec<PostmanAuthParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apikey: Vec<PostmanAuthParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub oauth1: Vec<PostmanAuthParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub oauth2: Vec<PostmanAuthParam>,
}

impl PostmanAuth {
    /// An auth block with only a type, e.g. `noauth`.
    #[must_use]
    pub fn of_type(auth_type: &str) -> Self {
        Self {
            auth_type: auth_type.to_string(),
            basic: Vec::new(),
            bearer: Vec::new(),
            apikey: Vec::new(),
            oauth1: Vec::new(),
            oauth2: Vec::new(),
        }
    }

    /// Get a parameter value by key as text; missing keys read as empty.
    #[must_use]
    pub fn get_param(params: &[PostmanAuthParam], key: &str) -> Option<String> {
        params.iter().find(|p| p.key == key).map(|p| scalar_text(&p.value))
    }
}

/// Auth parameter (key-value pair)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanAuthParam {
    pub key: String,
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
}

impl PostmanAuthParam {
    /// A string-typed parameter.
    #[must_use]
    pub fn string(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: Value::String(value.to_string()),
            param_type: Some("string".to_string()),
        }
    }
}

/// Variable definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanVariable {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub var_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<PostmanDescription>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}
