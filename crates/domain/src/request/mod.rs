//! Request types

mod body;
mod method;
mod param;

pub use body::{FileBody, FormDataItem, FormDataType, RawLanguage, RequestBody, UrlEncodedItem};
pub use method::HttpMethod;
pub use param::{Header, KeyValue, QueryParam, find_header};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;
use crate::id::generate_id;

/// Number of response entries kept per request.
pub const RESPONSE_CACHE_LIMIT: usize = 10;

/// A saved HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// HTTP method.
    #[serde(default)]
    pub method: HttpMethod,
    /// Target URL. May contain variable tokens.
    #[serde(default)]
    pub url: String,
    /// Headers in send order.
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Query parameters in send order.
    #[serde(default)]
    pub query_params: Vec<QueryParam>,
    /// Authorization; defaults to inheriting from the parent.
    #[serde(default = "AuthConfig::inherit")]
    pub auth: AuthConfig,
    /// Request payload.
    #[serde(default)]
    pub body: RequestBody,
    /// Declared content type of the payload.
    #[serde(default)]
    pub content_type: String,
    /// Most recent responses, oldest first. Informational only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<ResponseEntry>,
}

impl Request {
    /// Creates an empty GET request with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            description: None,
            method: HttpMethod::Get,
            url: String::new(),
            headers: Vec::new(),
            query_params: Vec::new(),
            auth: AuthConfig::InheritParent,
            body: RequestBody::None,
            content_type: String::new(),
            responses: Vec::new(),
        }
    }

    /// Sets the method and URL.
    #[must_use]
    pub fn with_target(mut self, method: HttpMethod, url: impl Into<String>) -> Self {
        self.method = method;
        self.url = url.into();
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(key, value));
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push(QueryParam::new(key, value));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Sets the authorization.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Appends a response, evicting the oldest ones beyond [`RESPONSE_CACHE_LIMIT`].
    pub fn push_response(&mut self, entry: ResponseEntry) {
        self.responses.push(entry);
        let overflow = self.responses.len().saturating_sub(RESPONSE_CACHE_LIMIT);
        if overflow > 0 {
            self.responses.drain(..overflow);
        }
    }

    /// The last recorded response, if any.
    #[must_use]
    pub fn last_response(&self) -> Option<&ResponseEntry> {
        self.responses.last()
    }
}

/// A cached response outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEntry {
    /// Status text, e.g. `"OK"` or `"Error"`.
    pub status: String,
    /// Status code; `0` when the request never completed.
    pub code: u16,
    /// Response body text.
    #[serde(default)]
    pub body: String,
    /// When the response was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ResponseEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn now(code: u16, status: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            code,
            body: body.into(),
            timestamp: Utc::now(),
        }
    }
}
