//! Transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port. It is the only place in
//! the workspace that performs network I/O.

use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use workbench_application::ports::{
    FormPart, Transport, TransportBody, TransportError, TransportRequest, TransportResponse,
    TransportResult,
};
use workbench_domain::HttpMethod;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Redirects followed before giving up.
const MAX_REDIRECTS: usize = 10;

const USER_AGENT: &str = concat!("api-workbench/", env!("CARGO_PKG_VERSION"));

/// HTTP transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout_ms: u64,
}

impl ReqwestTransport {
    /// Creates a transport with the default 30 second timeout.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: `api-workbench/<version>`
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> TransportResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_MS)
    }

    /// Creates a transport with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn with_timeout(timeout_ms: u64) -> TransportResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client, timeout_ms })
    }

    /// Creates a transport around an existing client.
    #[must_use]
    pub const fn with_client(client: Client, timeout_ms: u64) -> Self {
        Self { client, timeout_ms }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Attaches the body, setting a content type unless a header already does.
    async fn build_body(
        mut builder: RequestBuilder,
        request: &TransportRequest,
    ) -> TransportResult<RequestBuilder> {
        let has_content_type = request.header("content-type").is_some();

        match &request.body {
            None => Ok(builder),

            Some(TransportBody::Raw {
                content,
                content_type,
            }) => {
                if let Some(content_type) = content_type
                    && !has_content_type
                {
                    builder = builder.header("Content-Type", content_type);
                }
                Ok(builder.body(content.clone()))
            }

            Some(TransportBody::UrlEncoded(pairs)) => {
                let encoded = serde_urlencoded::to_string(pairs)
                    .map_err(|e| TransportError::Other(format!("Invalid form body: {e}")))?;
                if !has_content_type {
                    builder = builder.header("Content-Type", "application/x-www-form-urlencoded");
                }
                Ok(builder.body(encoded))
            }

            Some(TransportBody::Multipart(parts)) => {
                let mut form = Form::new();
                for part in parts {
                    form = match part {
                        FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                        FormPart::File { name, path } => {
                            form.part(name.clone(), Self::file_part(path).await?)
                        }
                    };
                }
                Ok(builder.multipart(form))
            }

            Some(TransportBody::File { path }) => {
                let bytes = read_file(path).await?;
                if !has_content_type {
                    let mime = mime_guess::from_path(path).first_or_octet_stream();
                    builder = builder.header("Content-Type", mime.essence_str());
                }
                Ok(builder.body(bytes))
            }
        }
    }

    async fn file_part(path: &Path) -> TransportResult<Part> {
        let bytes = read_file(path).await?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.essence_str())
            .map_err(|e| TransportError::Other(e.to_string()))
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(&self, error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout(self.timeout_ms);
        }
        if error.is_connect() {
            return TransportError::Connection(error.to_string());
        }
        if error.is_builder() {
            let url = error.url().map(ToString::to_string).unwrap_or_default();
            return TransportError::InvalidUrl(url);
        }
        TransportError::Other(error.to_string())
    }
}

async fn read_file(path: &Path) -> TransportResult<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| TransportError::File {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &TransportRequest) -> TransportResult<TransportResponse> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|_| TransportError::InvalidUrl(request.url.clone()))?;

        let start = Instant::now();
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = Self::build_body(builder, request).await?;

        let response = builder.send().await.map_err(|e| self.map_error(&e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Other(format!("Failed to read body: {e}")))?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            code = status.as_u16(),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "response received"
        );

        Ok(TransportResponse {
            status: status.canonical_reason().unwrap_or_default().to_string(),
            code: status.as_u16(),
            body,
            content_type,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn request(body: Option<TransportBody>) -> TransportRequest {
        TransportRequest {
            method: HttpMethod::Post,
            url: "http://localhost/echo".to_string(),
            headers: Vec::new(),
            body,
        }
    }

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new().unwrap()
    }

    async fn built(request: &TransportRequest) -> reqwest::Request {
        let transport = transport();
        let builder = transport.client.request(Method::POST, request.url.as_str());
        ReqwestTransport::build_body(builder, request)
            .await
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(ReqwestTransport::to_reqwest_method(HttpMethod::Get), Method::GET);
        assert_eq!(ReqwestTransport::to_reqwest_method(HttpMethod::Post), Method::POST);
        assert_eq!(ReqwestTransport::to_reqwest_method(HttpMethod::Head), Method::HEAD);
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Options),
            Method::OPTIONS
        );
    }

    #[test]
    fn test_user_agent() {
        assert!(USER_AGENT.starts_with("api-workbench/"));
    }

    #[tokio::test]
    async fn test_raw_body_sets_content_type() {
        let built = built(&request(Some(TransportBody::Raw {
            content: "{}".to_string(),
            content_type: Some("application/json".to_string()),
        })))
        .await;

        assert_eq!(built.headers()["content-type"], "application/json");
        assert_eq!(built.body().unwrap().as_bytes(), Some(b"{}".as_slice()));
    }

    #[tokio::test]
    async fn test_explicit_header_wins() {
        let mut request = request(Some(TransportBody::Raw {
            content: "<a/>".to_string(),
            content_type: Some("application/json".to_string()),
        }));
        request.headers.push(("Content-Type".to_string(), "application/xml".to_string()));

        let built = built(&request).await;
        assert!(built.headers().get("content-type").is_none());
    }

    #[tokio::test]
    async fn test_urlencoded_body() {
        let built = built(&request(Some(TransportBody::UrlEncoded(vec![
            ("q".to_string(), "a b".to_string()),
            ("n".to_string(), "1&2".to_string()),
        ]))))
        .await;

        assert_eq!(
            built.headers()["content-type"],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(built.body().unwrap().as_bytes(), Some(b"q=a+b&n=1%262".as_slice()));
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.bin");
        let transport = transport();
        let builder = transport.client.request(Method::POST, "http://localhost/upload");

        let error = ReqwestTransport::build_body(
            builder,
            &request(Some(TransportBody::File { path: path.clone() })),
        )
        .await
        .unwrap_err();
        assert!(matches!(error, TransportError::File { path: p, .. } if p == path.display().to_string()));
    }

    #[tokio::test]
    async fn test_file_body_guesses_mime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("payload.json");
        std::fs::write(&path, b"[1]").unwrap();

        let built = built(&request(Some(TransportBody::File { path }))).await;
        assert_eq!(built.headers()["content-type"], "application/json");
        assert_eq!(built.body().unwrap().as_bytes(), Some(b"[1]".as_slice()));
    }

    #[tokio::test]
    async fn test_unparseable_url() {
        let mut request = request(None);
        request.url = "not a url".to_string();
        let error = transport().send(&request).await.unwrap_err();
        assert_eq!(error, TransportError::InvalidUrl("not a url".to_string()));
    }
}
