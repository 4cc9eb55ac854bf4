//! Request body variants.

use serde::{Deserialize, Serialize};

/// Request body payload.
///
/// The `mode` field is the discriminator; only the fields of the active
/// variant are meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RequestBody {
    /// No body.
    #[default]
    None,

    /// Free-form text body.
    Raw {
        /// The body text. May contain variable tokens.
        #[serde(default)]
        content: String,
        /// Syntax of the content; unset means JSON.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<RawLanguage>,
    },

    /// Multipart form data.
    #[serde(rename = "formdata", alias = "form-data")]
    FormData {
        /// Form fields in send order.
        #[serde(default)]
        items: Vec<FormDataItem>,
    },

    /// `application/x-www-form-urlencoded` fields.
    #[serde(rename = "urlencoded")]
    UrlEncoded {
        /// Fields in send order.
        #[serde(default)]
        items: Vec<UrlEncodedItem>,
    },

    /// A single file sent as the whole body.
    File(FileBody),

    /// GraphQL query with its variables document.
    #[serde(rename = "graphql")]
    GraphQl {
        /// The query text.
        #[serde(default)]
        query: String,
        /// Variables as a JSON text.
        #[serde(default)]
        variables: String,
    },
}

impl RequestBody {
    /// Creates a raw body with an explicit language.
    #[must_use]
    pub fn raw(content: impl Into<String>, language: RawLanguage) -> Self {
        Self::Raw {
            content: content.into(),
            language: Some(language),
        }
    }

    /// Creates a raw JSON body.
    #[must_use]
    pub fn json(content: impl Into<String>) -> Self {
        Self::raw(content, RawLanguage::Json)
    }

    /// Returns true when the body carries no payload.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the raw text if this is a raw body.
    #[must_use]
    pub fn raw_content(&self) -> Option<&str> {
        match self {
            Self::Raw { content, .. } => Some(content),
            _ => None,
        }
    }
}

/// Language of a raw body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RawLanguage {
    /// JSON (the default).
    #[default]
    Json,
    /// HTML markup.
    Html,
    /// XML markup.
    Xml,
    /// Plain text.
    Text,
    /// JavaScript source.
    Javascript,
}

impl RawLanguage {
    /// Resolves an optional language to the one consumers should assume.
    #[must_use]
    pub fn effective(language: Option<Self>) -> Self {
        language.unwrap_or_default()
    }

    /// Returns the lowercase tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Xml => "xml",
            Self::Text => "text",
            Self::Javascript => "javascript",
        }
    }

    /// Parses a tag, ignoring case. Unknown tags yield `None`.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "html" => Some(Self::Html),
            "xml" => Some(Self::Xml),
            "text" => Some(Self::Text),
            "javascript" => Some(Self::Javascript),
            _ => None,
        }
    }

    /// Content type matching this language.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Html => "text/html",
            Self::Xml => "application/xml",
            Self::Text => "text/plain",
            Self::Javascript => "application/javascript",
        }
    }
}

/// A multipart form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDataItem {
    /// Field name.
    pub key: String,
    /// Text value (ignored for file fields).
    #[serde(default)]
    pub value: String,
    /// Whether the field carries text or a file.
    #[serde(rename = "type", default)]
    pub item_type: FormDataType,
    /// Path of the file to upload for file fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Whether the field is sent.
    #[serde(default = "default_true")]
    pub is_selected: bool,
}

impl FormDataItem {
    /// Creates a selected text field.
    #[must_use]
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            item_type: FormDataType::Text,
            src: None,
            is_selected: true,
        }
    }

    /// Creates a selected file field.
    #[must_use]
    pub fn file(key: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: String::new(),
            item_type: FormDataType::File,
            src: Some(src.into()),
            is_selected: true,
        }
    }
}

/// Kind of a multipart form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormDataType {
    /// Plain text value.
    #[default]
    Text,
    /// File upload.
    File,
}

/// A urlencoded form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlEncodedItem {
    /// Field name.
    pub key: String,
    /// Field value.
    #[serde(default)]
    pub value: String,
    /// Whether the field is sent.
    #[serde(default = "default_true")]
    pub is_selected: bool,
}

impl UrlEncodedItem {
    /// Creates a selected field.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            is_selected: true,
        }
    }
}

/// A file used as the whole request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FileBody {
    /// Display name of the file.
    #[serde(default)]
    pub name: String,
    /// Inline content, when the file was loaded into memory.
    #[serde(default)]
    pub content: String,
    /// Path of the file on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

pub(crate) const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_raw_body_wire_format() {
        let body = RequestBody::json("{\"a\":1}");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({"mode": "raw", "content": "{\"a\":1}", "language": "json"})
        );
    }

    #[test]
    fn test_form_data_accepts_legacy_tag() {
        let body: RequestBody = serde_json::from_value(json!({
            "mode": "form-data",
            "items": [{"key": "avatar", "type": "file", "src": "/tmp/a.png"}]
        }))
        .unwrap();

        let RequestBody::FormData { items } = body else {
            unreachable!("Expected form data body");
        };
        assert_eq!(items, vec![FormDataItem::file("avatar", "/tmp/a.png")]);
    }

    #[test]
    fn test_form_data_serializes_canonical_tag() {
        let body = RequestBody::FormData {
            items: vec![FormDataItem::text("a", "b")],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["mode"], "formdata");
    }

    #[test]
    fn test_file_body_is_flat() {
        let body = RequestBody::File(FileBody {
            name: "data.bin".to_string(),
            content: String::new(),
            src: Some("/data.bin".to_string()),
        });
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({"mode": "file", "name": "data.bin", "content": "", "src": "/data.bin"})
        );
    }

    #[test]
    fn test_raw_language_defaults_to_json() {
        assert_eq!(RawLanguage::effective(None), RawLanguage::Json);
        assert_eq!(
            RawLanguage::effective(Some(RawLanguage::Xml)),
            RawLanguage::Xml
        );
        assert_eq!(RawLanguage::parse("JavaScript"), Some(RawLanguage::Javascript));
        assert_eq!(RawLanguage::parse("yaml"), None);
    }

    #[test]
    fn test_unit_body_roundtrip() {
        let body: RequestBody = serde_json::from_value(json!({"mode": "none"})).unwrap();
        assert!(body.is_none());
    }
}
