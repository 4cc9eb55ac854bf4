//! Request preparation
//!
//! Turns a stored request into a [`TransportRequest`]: inherited auth is
//! resolved, variables are substituted, credentials are applied and only
//! selected headers and parameters are kept.

use std::path::PathBuf;

use url::Url;
use workbench_domain::{
    AuthConfig, Collection, FormDataType, NodeKind, RawLanguage, Request, RequestBody, resolve_auth,
};

use crate::auth::{AuthResolution, resolve_credentials};
use crate::ports::{FormPart, TransportBody, TransportError, TransportRequest, TransportResult};
use crate::variable_resolver::SubstitutionEngine;

/// Returns the auth that applies to a request.
///
/// A request's own setting wins unless it is `InheritParent`, in which case
/// the walk starts at its owning folder.
#[must_use]
pub fn effective_auth(collection: &Collection, request: &Request) -> AuthConfig {
    if request.auth.is_inherit() {
        resolve_auth(collection, &request.id, NodeKind::Request)
    } else {
        request.auth.clone()
    }
}

/// Checks that a URL is present and absolute http(s).
///
/// # Errors
///
/// Returns `EmptyUrl` for a blank URL and `InvalidUrl` otherwise.
pub fn validate_url(raw: &str) -> TransportResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TransportError::EmptyUrl);
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(TransportError::InvalidUrl(raw.to_string()));
    }
    Url::parse(trimmed).map_err(|_| TransportError::InvalidUrl(raw.to_string()))
}

/// Materializes a stored request for sending.
///
/// # Errors
///
/// Returns `EmptyUrl` or `InvalidUrl` if the substituted URL cannot be sent.
pub fn prepare_request(
    collection: &Collection,
    request: &Request,
    engine: &SubstitutionEngine,
) -> TransportResult<TransportRequest> {
    let mut effective = request.clone();
    effective.auth = effective_auth(collection, request);
    let ready = engine.substitute(&effective, &collection.variables);

    let mut url = validate_url(&ready.url)?;
    let mut headers: Vec<(String, String)> = ready
        .headers
        .iter()
        .filter(|h| h.is_selected && !h.key.trim().is_empty())
        .map(|h| (h.key.clone(), h.value.clone()))
        .collect();

    let mut query: Vec<(String, String)> = ready
        .query_params
        .iter()
        .filter(|p| p.is_selected && !p.key.trim().is_empty())
        .map(|p| (p.key.clone(), p.value.clone()))
        .collect();

    match resolve_credentials(&ready.auth) {
        AuthResolution::None => {}
        AuthResolution::Header { name, value } => {
            headers.retain(|(key, _)| !key.eq_ignore_ascii_case(&name));
            headers.push((name, value));
        }
        AuthResolution::QueryParam { name, value } => query.push((name, value)),
    }

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(&query);
    }

    let body = build_body(&ready);
    if let Some(TransportBody::Raw {
        content_type: Some(content_type),
        ..
    }) = &body
        && !headers
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case("Content-Type"))
    {
        headers.push(("Content-Type".to_string(), content_type.clone()));
    }

    tracing::debug!(request_id = %request.id, method = %ready.method, url = %url, "prepared request");

    Ok(TransportRequest {
        method: ready.method,
        url: url.into(),
        headers,
        body,
    })
}

fn build_body(request: &Request) -> Option<TransportBody> {
    match &request.body {
        RequestBody::None => None,
        RequestBody::Raw { content, language } => {
            let content_type = if request.content_type.trim().is_empty() {
                RawLanguage::effective(*language).content_type().to_string()
            } else {
                request.content_type.clone()
            };
            Some(TransportBody::Raw {
                content: content.clone(),
                content_type: Some(content_type),
            })
        }
        RequestBody::FormData { items } => Some(TransportBody::Multipart(
            items
                .iter()
                .filter(|item| item.is_selected && !item.key.is_empty())
                .map(|item| match (item.item_type, item.src.as_deref()) {
                    (FormDataType::File, Some(src)) if !src.is_empty() => FormPart::File {
                        name: item.key.clone(),
                        path: PathBuf::from(src),
                    },
                    _ => FormPart::Text {
                        name: item.key.clone(),
                        value: item.value.clone(),
                    },
                })
                .collect(),
        )),
        RequestBody::UrlEncoded { items } => Some(TransportBody::UrlEncoded(
            items
                .iter()
                .filter(|item| item.is_selected && !item.key.is_empty())
                .map(|item| (item.key.clone(), item.value.clone()))
                .collect(),
        )),
        RequestBody::File(file) => match file.src.as_deref() {
            Some(src) if !src.is_empty() => Some(TransportBody::File {
                path: PathBuf::from(src),
            }),
            _ => Some(TransportBody::Raw {
                content: file.content.clone(),
                content_type: (!request.content_type.is_empty())
                    .then(|| request.content_type.clone()),
            }),
        },
        RequestBody::GraphQl { query, variables } => {
            let variables = serde_json::from_str::<serde_json::Value>(variables)
                .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));
            let payload = serde_json::json!({ "query": query, "variables": variables });
            Some(TransportBody::Raw {
                content: payload.to_string(),
                content_type: Some("application/json".to_string()),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use workbench_domain::{
        ApiKeyLocation, Folder, FormDataItem, Header, HttpMethod, UrlEncodedItem, Variable,
    };

    fn collection_with(request: Request) -> Collection {
        Collection::new("api")
            .with_auth(AuthConfig::bearer("{{token}}"))
            .with_variable(Variable::new("base", "https://api.test"))
            .with_variable(Variable::new("token", "t-1"))
            .with_folder(Folder::new("users").with_request(request))
    }

    fn prepare(collection: &Collection, request: &Request) -> TransportResult<TransportRequest> {
        prepare_request(collection, request, &SubstitutionEngine::default())
    }

    #[test]
    fn test_inherited_auth_is_resolved_and_substituted() {
        let request = Request::new("list").with_target(HttpMethod::Get, "{{base}}/users");
        let collection = collection_with(request.clone());

        let prepared = prepare(&collection, &request).unwrap();
        assert_eq!(prepared.url, "https://api.test/users");
        assert_eq!(prepared.header("authorization"), Some("Bearer t-1"));
        assert_eq!(prepared.body, None);
    }

    #[test]
    fn test_own_auth_overrides_inheritance() {
        let request = Request::new("list")
            .with_target(HttpMethod::Get, "https://api.test/users")
            .with_auth(AuthConfig::None);
        let collection = collection_with(request.clone());

        let prepared = prepare(&collection, &request).unwrap();
        assert_eq!(prepared.header("Authorization"), None);
    }

    #[test]
    fn test_unselected_items_are_skipped() {
        let mut request = Request::new("search")
            .with_target(HttpMethod::Get, "https://api.test/search")
            .with_query_param("q", "rust")
            .with_auth(AuthConfig::api_key("key", "k-1", ApiKeyLocation::Query));
        request.query_params.push(workbench_domain::QueryParam::unselected("debug", "1"));
        request.headers.push(Header::unselected("X-Trace", "on"));
        let collection = collection_with(request.clone());

        let prepared = prepare(&collection, &request).unwrap();
        assert_eq!(prepared.url, "https://api.test/search?q=rust&key=k-1");
        assert_eq!(prepared.header("X-Trace"), None);
    }

    #[test]
    fn test_url_validation() {
        let collection = Collection::new("api");
        let empty = Request::new("empty");
        assert_eq!(prepare(&collection, &empty), Err(TransportError::EmptyUrl));

        let relative = Request::new("rel").with_target(HttpMethod::Get, "/users");
        assert_eq!(
            prepare(&collection, &relative),
            Err(TransportError::InvalidUrl("/users".to_string()))
        );

        let unresolved = Request::new("tpl").with_target(HttpMethod::Get, "{{host}}/users");
        assert_eq!(
            prepare(&collection, &unresolved),
            Err(TransportError::InvalidUrl("{{host}}/users".to_string()))
        );
    }

    #[test]
    fn test_json_body_gets_content_type() {
        let request = Request::new("create")
            .with_target(HttpMethod::Post, "https://api.test/users")
            .with_body(RequestBody::json(r#"{"name": "{{token}}"}"#));
        let collection = collection_with(request.clone());

        let prepared = prepare(&collection, &request).unwrap();
        assert_eq!(prepared.header("Content-Type"), Some("application/json"));
        let Some(TransportBody::Raw { content, .. }) = prepared.body else {
            unreachable!("Expected raw body");
        };
        assert_eq!(content, r#"{"name":"t-1"}"#);
    }

    #[test]
    fn test_explicit_content_type_header_is_kept() {
        let request = Request::new("create")
            .with_target(HttpMethod::Post, "https://api.test/users")
            .with_header("content-type", "application/vnd.api+json")
            .with_body(RequestBody::json("{}"));
        let collection = collection_with(request.clone());

        let prepared = prepare(&collection, &request).unwrap();
        let content_types: Vec<_> = prepared
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .collect();
        assert_eq!(content_types.len(), 1);
        assert_eq!(prepared.header("Content-Type"), Some("application/vnd.api+json"));
    }

    #[test]
    fn test_form_bodies() {
        let request = Request::new("upload")
            .with_target(HttpMethod::Post, "https://api.test/files")
            .with_body(RequestBody::FormData {
                items: vec![
                    FormDataItem::text("title", "{{token}}"),
                    FormDataItem::file("doc", "/tmp/a.pdf"),
                ],
            });
        let collection = collection_with(request.clone());
        let prepared = prepare(&collection, &request).unwrap();
        assert_eq!(
            prepared.body,
            Some(TransportBody::Multipart(vec![
                FormPart::Text {
                    name: "title".to_string(),
                    value: "t-1".to_string(),
                },
                FormPart::File {
                    name: "doc".to_string(),
                    path: PathBuf::from("/tmp/a.pdf"),
                },
            ]))
        );

        let request = Request::new("login")
            .with_target(HttpMethod::Post, "https://api.test/login")
            .with_body(RequestBody::UrlEncoded {
                items: vec![UrlEncodedItem::new("user", "ann")],
            });
        let collection = collection_with(request.clone());
        let prepared = prepare(&collection, &request).unwrap();
        assert_eq!(
            prepared.body,
            Some(TransportBody::UrlEncoded(vec![("user".to_string(), "ann".to_string())]))
        );
    }

    #[test]
    fn test_graphql_body_is_json_envelope() {
        let request = Request::new("gql")
            .with_target(HttpMethod::Post, "https://api.test/graphql")
            .with_body(RequestBody::GraphQl {
                query: "{ me { id } }".to_string(),
                variables: r#"{"id": 1}"#.to_string(),
            });
        let collection = collection_with(request.clone());
        let prepared = prepare(&collection, &request).unwrap();
        let Some(TransportBody::Raw { content, .. }) = prepared.body else {
            unreachable!("Expected raw body");
        };
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["query"], "{ me { id } }");
        assert_eq!(value["variables"]["id"], 1);
    }
}
