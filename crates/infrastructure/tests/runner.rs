//! Runner over imported collections with a scripted transport.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use workbench_application::ports::{
    CollectionStorage, Transport, TransportBody, TransportError, TransportRequest,
    TransportResponse, TransportResult,
};
use workbench_application::{CollectionRunner, RunState, RunnerConfig};
use workbench_domain::Collection;
use workbench_infrastructure::{ImportConfig, InMemoryStorage, import_document};

/// Replies from a fixed script and records what it was asked to send.
#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<VecDeque<TransportResult<TransportResponse>>>,
    sent: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    fn new(replies: impl IntoIterator<Item = TransportResult<TransportResponse>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            sent: Mutex::default(),
        }
    }

    fn sent(&self) -> Vec<TransportRequest> {
        self.sent.lock().unwrap().clone()
    }
}

fn ok(code: u16, status: &str, body: &str) -> TransportResult<TransportResponse> {
    Ok(TransportResponse {
        status: status.to_string(),
        code,
        body: body.to_string(),
        content_type: Some("application/json".to_string()),
    })
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: &TransportRequest) -> TransportResult<TransportResponse> {
        self.sent.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ok(200, "OK", "{}"))
    }
}

const POSTMAN: &str = r#"{
  "info": {"name": "Shop", "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"},
  "auth": {"type": "apikey", "apikey": [
    {"key": "key", "value": "X-Api-Key"}, {"key": "value", "value": "{{apiKey}}"}, {"key": "in", "value": "header"}
  ]},
  "variable": [{"key": "host", "value": "https://shop.test"}, {"key": "apiKey", "value": "k-123"}],
  "item": [
    {"name": "List", "request": {"method": "GET", "url": "{{host}}/products"}},
    {"name": "Create", "request": {
      "method": "POST",
      "url": "{{host}}/products",
      "body": {"mode": "raw", "raw": "{\"name\": \"{{host}}\"}", "options": {"raw": {"language": "json"}}}
    }},
    {"name": "Broken", "request": {"method": "GET", "url": "{{missing}}/x"}}
  ]
}"#;

fn shop() -> Collection {
    import_document(POSTMAN, "shop.json", &ImportConfig::default())
        .unwrap()
        .collection
}

fn ids(collection: &Collection, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .map(|name| {
            collection
                .requests
                .iter()
                .find(|r| r.name == *name)
                .unwrap()
                .id
                .clone()
        })
        .collect()
}

#[tokio::test]
async fn run_substitutes_and_applies_inherited_auth() {
    let collection = shop();
    let transport = Arc::new(ScriptedTransport::new([
        ok(200, "OK", "[]"),
        ok(201, "Created", r#"{"id": 1}"#),
    ]));
    let mut runner = CollectionRunner::new(Arc::clone(&transport), RunnerConfig::default());

    let summary = runner.run(&collection, &ids(&collection, &["List", "Create"])).await;

    assert_eq!((summary.total, summary.succeeded, summary.failed), (2, 2, 0));
    assert_eq!(runner.state(), RunState::Completed);

    let sent = transport.sent();
    assert_eq!(sent[0].url, "https://shop.test/products");
    assert_eq!(sent[0].header("X-Api-Key"), Some("k-123"));
    assert_eq!(
        sent[1].body,
        Some(TransportBody::Raw {
            content: "{\"name\": \"https://shop.test\"}".to_string(),
            content_type: Some("application/json".to_string()),
        })
    );
}

#[tokio::test]
async fn failures_are_recorded_not_raised() {
    let collection = shop();
    let transport = Arc::new(ScriptedTransport::new([Err(TransportError::Connection(
        "connection refused".to_string(),
    ))]));
    let mut runner = CollectionRunner::new(Arc::clone(&transport), RunnerConfig::new(1, 0));

    let summary = runner
        .run(&collection, &ids(&collection, &["List", "Broken"]))
        .await;

    assert_eq!((summary.total, summary.failed), (2, 2));
    let records: Vec<_> = runner
        .results()
        .iter()
        .map(|r| (r.code, r.status.as_str(), r.body.as_str()))
        .collect();
    assert_eq!(
        records,
        vec![
            (0, "Error", "Error: Connection failed: connection refused"),
            (0, "Error", "Error: Invalid URL - {{missing}}/x"),
        ]
    );
    // The broken URL never reaches the transport.
    assert_eq!(transport.sent().len(), 1);
}

#[tokio::test]
async fn results_are_cached_and_stored() {
    let collection = shop();
    let storage = InMemoryStorage::new();
    let transport = Arc::new(ScriptedTransport::new([ok(200, "OK", "first"), ok(503, "Service Unavailable", "second")]));
    let mut runner = CollectionRunner::new(transport, RunnerConfig::new(2, 0));

    let list = ids(&collection, &["List"]);
    let summary = runner.run(&collection, &list).await;
    assert_eq!((summary.total, summary.succeeded, summary.failed), (2, 1, 1));

    let updated = runner.record_results(&collection);
    storage.put(&updated).await.unwrap();

    let stored = storage.get(&collection.id).await.unwrap().unwrap();
    let request = stored.requests.iter().find(|r| r.id == list[0]).unwrap();
    let cached: Vec<_> = request.responses.iter().map(|r| (r.code, r.body.as_str())).collect();
    assert_eq!(cached, vec![(200, "first"), (503, "second")]);
}
