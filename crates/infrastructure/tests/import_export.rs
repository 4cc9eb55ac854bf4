//! Import → export round trips and the detection matrix.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use pretty_assertions::assert_eq;
use serde_json::Value;
use workbench_domain::{AuthConfig, Collection, HttpMethod, Request};
use workbench_infrastructure::{
    FormatKind, ImportConfig, ImportError, detect, export_collection_json, import_document,
};

const POSTMAN: &str = r#"{
  "info": {
    "_postman_id": "5b1c",
    "name": "Shop",
    "description": "Orders and products",
    "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
  },
  "auth": {"type": "bearer", "bearer": [{"key": "token", "value": "{{token}}", "type": "string"}]},
  "variable": [{"key": "host", "value": "https://shop.test"}],
  "item": [
    {
      "name": "Orders",
      "item": [
        {
          "name": "Create order",
          "request": {
            "method": "POST",
            "header": [
              {"key": "Content-Type", "value": "application/json"},
              {"key": "X-Debug", "value": "1", "disabled": true}
            ],
            "url": {"raw": "{{host}}/orders?dryRun=true", "host": ["{{host}}"], "path": ["orders"],
                    "query": [{"key": "dryRun", "value": "true"}]},
            "body": {"mode": "raw", "raw": "{\"sku\": \"{{$randomUUID}}\"}", "options": {"raw": {"language": "json"}}}
          }
        }
      ]
    },
    {
      "name": "Health",
      "request": {"method": "GET", "url": "{{host}}/health", "auth": {"type": "noauth"}}
    }
  ]
}"#;

/// (name, method, url, headers, raw body) for every request, depth-first.
fn fingerprint(collection: &Collection) -> Vec<(String, HttpMethod, String, Vec<(String, String)>, Option<String>)> {
    fn walk(folders: &[workbench_domain::Folder], requests: &[Request], out: &mut Vec<(String, HttpMethod, String, Vec<(String, String)>, Option<String>)>) {
        for folder in folders {
            walk(&folder.folders, &folder.requests, out);
        }
        for request in requests {
            out.push((
                request.name.clone(),
                request.method,
                request.url.clone(),
                request
                    .headers
                    .iter()
                    .map(|h| (h.key.clone(), h.value.clone()))
                    .collect(),
                request.body.raw_content().map(str::to_string),
            ));
        }
    }
    let mut out = Vec::new();
    walk(&collection.folders, &collection.requests, &mut out);
    out
}

fn import(raw: &str, file_name: &str) -> Collection {
    import_document(raw, file_name, &ImportConfig::default())
        .unwrap()
        .collection
}

#[test]
fn postman_round_trip_keeps_requests() {
    let first = import(POSTMAN, "shop.postman_collection.json");
    let exported = export_collection_json(&first).unwrap();
    let second = import(&exported, "shop.json");

    assert_eq!(fingerprint(&second), fingerprint(&first));
    assert_eq!(second.name, "Shop");
    assert_eq!(second.description.as_deref(), Some("Orders and products"));
    assert_eq!(second.auth, Some(AuthConfig::bearer("{{token}}")));
    assert_eq!(second.variable("host").unwrap().initial_value, "https://shop.test");
}

#[test]
fn postman_round_trip_keeps_selection_and_auth_inheritance() {
    let second = import(&export_collection_json(&import(POSTMAN, "a.json")).unwrap(), "b.json");

    let create = &second.folders[0].requests[0];
    let selected: Vec<_> = create.headers.iter().map(|h| (h.key.as_str(), h.is_selected)).collect();
    assert_eq!(selected, vec![("Content-Type", true), ("X-Debug", false)]);
    assert_eq!(create.query_params[0].key, "dryRun");
    assert!(create.auth.is_inherit());
    assert_eq!(second.folders[0].auth, None);
    assert_eq!(second.requests[0].auth, AuthConfig::None);
}

#[test]
fn export_is_stable_across_imports() {
    let collection = import(POSTMAN, "shop.json");
    let first = export_collection_json(&collection).unwrap();
    let again = export_collection_json(&import(&first, "shop.json")).unwrap();

    // Ids differ between imports; everything else must match.
    let mut a: Value = serde_json::from_str(&first).unwrap();
    let mut b: Value = serde_json::from_str(&again).unwrap();
    a["info"]["_postman_id"] = Value::Null;
    b["info"]["_postman_id"] = Value::Null;
    assert_eq!(a, b);
}

#[test]
fn openapi_import_exports_as_postman() {
    let raw = r"
openapi: 3.0.3
info:
  title: Users
servers:
  - url: https://users.test
paths:
  /users:
    get:
      summary: List users
    put:
      tags: [admin]
      requestBody:
        content:
          application/json:
            example: {name: ann}
";
    let collection = import(raw, "users.yaml");
    assert_eq!(collection.request_count(), 2);

    let exported: Value = serde_json::from_str(&export_collection_json(&collection).unwrap()).unwrap();
    assert_eq!(exported["item"][0]["name"], "admin");
    assert_eq!(exported["item"][0]["item"][0]["request"]["method"], "PUT");
    assert_eq!(exported["item"][1]["request"]["url"]["raw"], "{{baseUrl}}/users");
    assert_eq!(exported["variable"][0]["value"], "https://users.test");
}

#[test]
fn detection_matrix() {
    let cases: &[(&str, &str, FormatKind)] = &[
        (r#"{"openapi":"3.0.0","paths":{}}"#, "a.json", FormatKind::OpenApi),
        ("openapi: 3.1.0\npaths: {}\n", "a.yaml", FormatKind::OpenApi),
        (r#"{"title":"X","version":"1.0","baseUri":"https://x"}"#, "x.json", FormatKind::Raml),
        ("#%RAML 1.0\ntitle: X\nversion: v1\nbaseUri: https://x\n", "x.raml", FormatKind::Raml),
        (POSTMAN, "shop.json", FormatKind::Postman),
        ("type Query { me: String }", "schema.graphql", FormatKind::GraphQl),
        (r#"{"openapi":"3.0.0","paths":{}}"#, "schema.graphql", FormatKind::GraphQl),
    ];

    for (raw, file_name, expected) in cases {
        assert_eq!(detect(raw, file_name).unwrap(), *expected, "{file_name}");
    }
}

#[test]
fn unknown_documents_are_rejected_without_a_collection() {
    for (raw, file_name) in [
        (r#"{"swagger":"2.0","paths":{}}"#, "old.json"),
        ("just some text", "notes.txt"),
        (r#"{"info":{"schema":"https://example.com/other"}}"#, "x.json"),
    ] {
        let result = import_document(raw, file_name, &ImportConfig::default());
        assert!(
            matches!(result, Err(ImportError::UnsupportedFormat(_))),
            "{file_name}: {result:?}"
        );
    }
}

#[test]
fn graphql_import_exports_one_post_request() {
    let collection = import("# endpoint: https://gql.test/graphql\ntype Query { a: Int }", "api.gql");
    let exported: Value = serde_json::from_str(&export_collection_json(&collection).unwrap()).unwrap();

    let request = &exported["item"][0]["request"];
    assert_eq!(request["method"], "POST");
    assert_eq!(request["url"]["host"], serde_json::json!(["gql", "test"]));
    assert_eq!(request["body"]["options"]["raw"]["language"], "json");
}

#[test]
fn postman_short_forms_are_accepted() {
    let raw = r#"{
      "info": {"name": "Short", "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"},
      "item": [
        {"name": "Ping", "request": "https://api.test/ping"},
        {"name": "Echo", "request": {"method": "POST", "url": "https://api.test/echo", "header": "Accept: text/plain\n"}}
      ]
    }"#;

    let collection = import(raw, "short.json");
    let ping = &collection.requests[0];
    assert_eq!((ping.method, ping.url.as_str()), (HttpMethod::Get, "https://api.test/ping"));

    let echo = &collection.requests[1];
    let headers: Vec<_> = echo.headers.iter().map(|h| (h.key.as_str(), h.value.as_str())).collect();
    assert_eq!(headers, vec![("Accept", "text/plain")]);

    // The exported form uses the object shapes and imports back unchanged.
    let again = import(&export_collection_json(&collection).unwrap(), "short.json");
    assert_eq!(fingerprint(&again), fingerprint(&collection));
}
