//! Batch lookup over HTTP.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use axum::http::{Method, StatusCode};
use serde_json::json;

use user_directory_integration_tests::TestApp;

fn returned_ids(body: &serde_json::Value) -> BTreeSet<i64> {
    body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_empty_batch() {
    let app = TestApp::new();
    let response = app
        .send(Method::POST, "/users/batch", None, Some(json!({ "ids": [] })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "users": [] }));
}

#[tokio::test]
async fn test_missing_ids_are_dropped() {
    let app = TestApp::new();
    let ids = app.seed(2).await;

    let response = app
        .send(
            Method::POST,
            "/users/batch",
            None,
            Some(json!({ "ids": [ids[0], 999, ids[1]] })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        returned_ids(&response.body),
        ids.iter().map(|id| id.as_i64()).collect()
    );

    let user = &response.body["users"][0];
    assert!(user["profile"]["user_name"].is_string());
    assert!(user.get("role").is_none());
}

#[tokio::test]
async fn test_repeated_ids_appear_once() {
    let app = TestApp::new();
    let ids = app.seed(1).await;

    let response = app
        .send(
            Method::POST,
            "/users/batch",
            None,
            Some(json!({ "ids": [ids[0], ids[0], ids[0]] })),
        )
        .await;
    assert_eq!(response.body["users"].as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_large_batches_are_complete_and_stable() {
    let app = TestApp::with_lookup_concurrency(32);
    let present = app.seed(500).await;

    let mut requested: Vec<i64> = present.iter().map(|id| id.as_i64()).collect();
    requested.extend(100_000..100_500);
    let expected: BTreeSet<i64> = present.iter().map(|id| id.as_i64()).collect();

    for _ in 0..10 {
        let response = app
            .send(
                Method::POST,
                "/users/batch",
                None,
                Some(json!({ "ids": requested })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(returned_ids(&response.body), expected);
    }
}

#[tokio::test]
async fn test_store_outage_yields_empty_batch() {
    let app = TestApp::new();
    let ids = app.seed(3).await;
    app.store.set_unavailable(true);

    let response = app
        .send(Method::POST, "/users/batch", None, Some(json!({ "ids": ids })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "users": [] }));
}
