//! Header and query parameter entries.

use serde::{Deserialize, Serialize};

use super::body::default_true;

/// A key-value entry that can be toggled without deletion.
///
/// Used for both headers and query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValue {
    /// Entry name.
    pub key: String,
    /// Entry value. May contain variable tokens.
    #[serde(default)]
    pub value: String,
    /// Optional documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the entry is sent.
    #[serde(default = "default_true")]
    pub is_selected: bool,
}

/// A request header.
pub type Header = KeyValue;

/// A URL query parameter.
pub type QueryParam = KeyValue;

impl KeyValue {
    /// Creates a selected entry.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            description: None,
            is_selected: true,
        }
    }

    /// Creates an entry that is kept but not sent.
    #[must_use]
    pub fn unselected(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            is_selected: false,
            ..Self::new(key, value)
        }
    }

    /// Adds a description to this entry.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Case-insensitive lookup of a selected header value.
#[must_use]
pub fn find_header<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.is_selected && h.key.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}
