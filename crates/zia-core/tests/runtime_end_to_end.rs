//! End-to-end tests for the shared runtime against a mock ZIA server.
//!
//! These exercise pagination, credentials and conflict retry together through
//! the real `reqwest` transport.

use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};
use zia_core::pagination::Paginator;
use zia_core::{ConflictRetryPolicy, Error, QueryParams, ServiceClient, ServiceClientBuilder};

#[derive(Debug, Deserialize, PartialEq)]
struct Item {
    id: i64,
}

/// Serves `total` items as `/items?page=N&pageSize=P`.
struct PagedItems {
    total: i64,
}

impl Respond for PagedItems {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let lookup = |key: &str| {
            request
                .url
                .query_pairs()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.parse::<i64>().ok())
        };
        let (Some(page), Some(size)) = (lookup("page"), lookup("pageSize")) else {
            return ResponseTemplate::new(400).set_body_string("missing paging keys");
        };
        let start = (page - 1) * size;
        let end = (start + size).min(self.total);
        let items: Vec<Value> = (start..end.max(start)).map(|id| json!({ "id": id })).collect();
        ResponseTemplate::new(200).set_body_json(items)
    }
}

async fn paged_server(total: i64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(PagedItems { total })
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn fetch_all_walks_every_page() {
    let server = paged_server(2500).await;
    let client = ServiceClient::new(server.uri()).unwrap();

    let items: Vec<Item> = client.fetch_all("/items", &QueryParams::new()).await.unwrap();

    assert_eq!(items.len(), 2500);
    assert_eq!(items[0], Item { id: 0 });
    assert_eq!(items[2499], Item { id: 2499 });

    let requests = server.received_requests().await.unwrap();
    let pages: Vec<Option<String>> = requests
        .iter()
        .map(|r| r.url.query().map(str::to_string))
        .collect();
    assert_eq!(
        pages,
        vec![
            Some("page=1&pageSize=1000".to_string()),
            Some("page=2&pageSize=1000".to_string()),
            Some("page=3&pageSize=1000".to_string()),
        ]
    );
}

#[tokio::test]
async fn fetch_all_exact_multiple_requests_trailing_empty_page() {
    let server = paged_server(20).await;
    let client = ServiceClientBuilder::new(server.uri())
        .unwrap()
        .with_page_size(10)
        .build()
        .unwrap();

    let items: Vec<Item> = client.fetch_all("/items", &QueryParams::new()).await.unwrap();

    assert_eq!(items.len(), 20);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn fetch_all_empty_collection_costs_one_request() {
    let server = paged_server(0).await;
    let client = ServiceClient::new(server.uri()).unwrap();

    let items: Vec<Item> = client.fetch_all("/items", &QueryParams::new()).await.unwrap();

    assert!(items.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn fetch_all_keeps_caller_filters_on_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("search", "eng"))
        .respond_with(PagedItems { total: 3 })
        .expect(2)
        .mount(&server)
        .await;

    let client = ServiceClientBuilder::new(server.uri())
        .unwrap()
        .with_page_size(2)
        .build()
        .unwrap();
    let filters = QueryParams::new().with("search", "eng");

    let items: Vec<Item> = client.fetch_all("/items", &filters).await.unwrap();
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn fetch_all_page_cap_stops_runaway_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}])))
        .mount(&server)
        .await;

    let client = ServiceClientBuilder::new(server.uri())
        .unwrap()
        .with_paginator(Paginator::new().with_page_size(2).with_max_pages(4))
        .build()
        .unwrap();

    let err = client
        .fetch_all::<Item>("/items", &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PageLimitExceeded { max_pages: 4, .. }));
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn fetch_all_fails_on_middle_page_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(PagedItems { total: 50 })
        .mount(&server)
        .await;

    let client = ServiceClientBuilder::new(server.uri())
        .unwrap()
        .with_page_size(10)
        .build()
        .unwrap();

    let err = client
        .fetch_all::<Item>("/items", &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ServiceUnavailable(_)));
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn delete_with_retry_gives_up_after_budget() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/departments/3"))
        .and(header("Authorization", "Bearer static-token"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_string(r#"{"code":"EDIT_LOCK_NOT_AVAILABLE","message":"busy"}"#),
        )
        .expect(3)
        .mount(&server)
        .await;

    let client = ServiceClientBuilder::new(server.uri())
        .unwrap()
        .with_token("static-token")
        .with_retry_policy(
            ConflictRetryPolicy::new()
                .with_max_attempts(3)
                .with_interval(Duration::from_millis(5)),
        )
        .build()
        .unwrap();

    let err = client.delete_with_retry("/departments/3").await.unwrap_err();
    assert!(err.is_edit_lock_conflict());
    assert_eq!(err.error_code(), "EDIT_LOCK_NOT_AVAILABLE");
    assert_eq!(err.api_error().unwrap().message, "busy");
}

#[tokio::test]
async fn conflict_without_marker_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/departments/3"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_string(r#"{"code":"DUPLICATE_ITEM","message":"name taken"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri()).unwrap();
    let err = client
        .update_with_retry::<_, Value>("/departments/3", &json!({"id": 3}))
        .await
        .unwrap_err();
    assert!(!err.is_edit_lock_conflict());
    assert_eq!(err.status(), Some(409));
}
