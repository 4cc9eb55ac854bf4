//! Transport port
//!
//! The single asynchronous boundary of the engine: a fully materialized
//! request goes out, a response or a failure comes back.

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;
use workbench_domain::HttpMethod;

/// A request ready to send. All templating and auth are already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL including query parameters.
    pub url: String,
    /// Headers in send order.
    pub headers: Vec<(String, String)>,
    /// Payload, if any.
    pub body: Option<TransportBody>,
}

impl TransportRequest {
    /// Returns the first header with this name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportBody {
    /// Text payload.
    Raw {
        /// Body text.
        content: String,
        /// Content type to send when no header sets one.
        content_type: Option<String>,
    },
    /// `application/x-www-form-urlencoded` pairs.
    UrlEncoded(Vec<(String, String)>),
    /// `multipart/form-data` parts.
    Multipart(Vec<FormPart>),
    /// Binary payload read from disk.
    File {
        /// Path of the file to send.
        path: PathBuf,
    },
}

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    /// Plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File field read from disk.
    File {
        /// Field name.
        name: String,
        /// Path of the file to attach.
        path: PathBuf,
    },
}

/// A received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Status text, e.g. `"OK"`.
    pub status: String,
    /// Status code.
    pub code: u16,
    /// Body text.
    pub body: String,
    /// Value of the `Content-Type` response header.
    pub content_type: Option<String>,
}

/// Failures that prevent a response from being received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The URL is blank.
    #[error("Please enter a URL")]
    EmptyUrl,

    /// The URL is not an absolute http(s) URL.
    #[error("Invalid URL - {0}")]
    InvalidUrl(String),

    /// The request timed out.
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// The connection could not be established.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// A local file referenced by the body could not be read.
    #[error("Could not read {path}: {message}")]
    File {
        /// Offending path.
        path: String,
        /// Reader message.
        message: String,
    },

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

/// Result type alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Sends prepared requests over the network.
pub trait Transport: Send + Sync {
    /// Sends a request and waits for the response.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` when no response could be obtained.
    fn send(
        &self,
        request: &TransportRequest,
    ) -> impl Future<Output = TransportResult<TransportResponse>> + Send;
}
