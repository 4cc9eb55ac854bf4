//! GraphQL projection
//!
//! Schema files are not parsed. Importing one yields a single introspection
//! request aimed at the endpoint named in a `# server:` or `# endpoint:`
//! comment, or at `/graphql` when there is none.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;
use workbench_domain::{Collection, HttpMethod, Request, RequestBody};

use super::importer::Normalized;
use super::warning::ImportWarning;

const COLLECTION_NAME: &str = "Imported GraphQL";
const REQUEST_NAME: &str = "GraphQL Query";
const DEFAULT_ENDPOINT: &str = "/graphql";
const INTROSPECTION_QUERY: &str = "{ __schema { types { name } } }";

static ENDPOINT_COMMENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?mi)^\s*#\s*(?:server|endpoint)\s*:\s*(\S+)").ok());

/// Builds the introspection collection for a GraphQL schema text.
#[must_use]
pub fn normalize(raw: &str) -> Normalized {
    let declared = declared_endpoint(raw);
    let mut warnings = Vec::new();
    if declared.is_none() {
        warnings.push(ImportWarning::info(
            COLLECTION_NAME,
            format!("no endpoint comment found; using {DEFAULT_ENDPOINT}"),
        ));
    }
    let endpoint = declared.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let body = serde_json::to_string_pretty(&json!({ "query": INTROSPECTION_QUERY }))
        .unwrap_or_default();
    let mut request = Request::new(REQUEST_NAME)
        .with_target(HttpMethod::Post, endpoint)
        .with_header("Content-Type", "application/json")
        .with_body(RequestBody::json(body));
    request.content_type = "application/json".to_string();

    Normalized::new(Collection::new(COLLECTION_NAME).with_request(request), warnings)
}

fn declared_endpoint(raw: &str) -> Option<String> {
    ENDPOINT_COMMENT
        .as_ref()?
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}
