//! Account lifecycle over HTTP: register, log in, read, update profile.

use axum::http::{Method, StatusCode};
use serde_json::json;

use user_directory_core::{UserId, UserRole};
use user_directory_integration_tests::TestApp;

#[tokio::test]
async fn test_ping() {
    let app = TestApp::new();
    let response = app.send(Method::GET, "/ping", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "message": "pong" }));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();
    assert_eq!(
        app.send(Method::GET, "/health", None, None).await.status,
        StatusCode::OK
    );
    assert_eq!(
        app.send(Method::GET, "/health/ready", None, None).await.status,
        StatusCode::OK
    );

    app.store.set_unavailable(true);
    assert_eq!(
        app.send(Method::GET, "/health/ready", None, None).await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_every_response_carries_a_request_id() {
    let app = TestApp::new();
    let response = app.send(Method::GET, "/ping", None, None).await;
    assert!(response.request_id.is_some());
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/users",
            None,
            Some(json!({ "email": "a@b.com", "user_name": "alice", "password": "pw" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(
        response.body["message"],
        "user alice is created, please check your email(a@b.com) to complete the registration"
    );

    let response = app
        .send(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": "a@b.com", "password": "pw" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "a@b.com");
    assert_eq!(response.body["role"], "customer");
    assert_eq!(response.body["active_status"], true);
    assert!(response.body.get("hashed_password").is_none());
    assert!(!response.body.to_string().contains("argon2"));
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new();
    app.register("a@b.com", "alice", "pw").await;

    let wrong = app
        .send(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": "a@b.com", "password": "nope" })),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong.body["error"], "invalid_argument");

    let missing = app
        .send(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": "ghost@b.com", "password": "pw" })),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let malformed = app
        .send(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": "nobody", "password": "pw" })),
        )
        .await;
    assert_eq!(malformed.status, StatusCode::NOT_FOUND);
    assert_eq!(malformed.body["error"], "not_found");
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.register("a@b.com", "alice", "pw").await;

    let response = app
        .send(
            Method::POST,
            "/users",
            None,
            Some(json!({ "email": "a@b.com", "user_name": "again", "password": "pw2" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "already_exists");
}

#[tokio::test]
async fn test_invalid_email_is_bad_request() {
    let app = TestApp::new();
    let response = app
        .send(
            Method::POST,
            "/users",
            None,
            Some(json!({ "email": "no-at-sign", "user_name": "x", "password": "pw" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreadable_body_is_json_bad_request() {
    let app = TestApp::new();

    let missing_fields = app
        .send(Method::POST, "/users", None, Some(json!({ "email": "a@b.com" })))
        .await;
    assert_eq!(missing_fields.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_fields.body["error"], "invalid_argument");
    assert!(missing_fields.body["message"].is_string());

    let wrong_shape = app
        .send(Method::POST, "/users/batch", None, Some(json!({ "ids": "1,2" })))
        .await;
    assert_eq!(wrong_shape.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_shape.body["error"], "invalid_argument");

    let no_body = app.send(Method::POST, "/users/login", None, None).await;
    assert_eq!(no_body.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_body.body["error"], "invalid_argument");

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_non_numeric_id_is_json_bad_request() {
    let app = TestApp::new();
    let response = app.send(Method::GET, "/users/abc", None, None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "invalid_argument");
    assert!(response.body["message"].is_string());
}

#[tokio::test]
async fn test_get_by_id() {
    let app = TestApp::new();
    let id = app.register("a@b.com", "alice", "pw").await;

    let response = app
        .send(Method::GET, &format!("/users/{id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], id.as_i64());
    assert_eq!(response.body["profile"]["user_name"], "alice");

    let response = app.send(Method::GET, "/users/999", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_self() {
    let app = TestApp::new();
    let id = app.register("a@b.com", "alice", "pw").await;
    app.issue_token("tok", id, UserRole::Customer).await;

    let response = app.send(Method::GET, "/users/me", Some("tok"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "a@b.com");

    let response = app.send(Method::GET, "/users/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "unauthenticated");
}

#[tokio::test]
async fn test_non_numeric_subject_is_bad_request() {
    let app = TestApp::new();
    app.claims.insert("tok", "abc", UserRole::Customer).await;

    let response = app.send(Method::GET, "/users/me", Some("tok"), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_update_policy() {
    let app = TestApp::new();
    let id = app.register("a@b.com", "alice", "pw").await;
    app.issue_token("tok", id, UserRole::Customer).await;

    let response = app
        .send(
            Method::PATCH,
            "/users/me/profile",
            Some("tok"),
            Some(json!({ "phone": "0388888888", "address": "1 Main St", "note": "ring" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["message"].is_string());

    // Only the username changes; everything else is left as it was.
    app.send(
        Method::PATCH,
        "/users/me/profile",
        Some("tok"),
        Some(json!({ "user_name": "alice2" })),
    )
    .await;

    // A present empty string clears.
    app.send(
        Method::PATCH,
        "/users/me/profile",
        Some("tok"),
        Some(json!({ "note": "" })),
    )
    .await;

    let me = app.send(Method::GET, "/users/me", Some("tok"), None).await;
    assert_eq!(me.body["profile"]["user_name"], "alice2");
    assert_eq!(me.body["profile"]["phone"], "0388888888");
    assert_eq!(me.body["address"][0]["address"], "1 Main St");
    assert_eq!(me.body["address"][0]["note"], "");
}

#[tokio::test]
async fn test_profile_update_rejections() {
    let app = TestApp::new();
    let id = app.register("a@b.com", "alice", "pw").await;
    app.issue_token("tok", id, UserRole::Customer).await;

    let empty = app
        .send(Method::PATCH, "/users/me/profile", Some("tok"), Some(json!({})))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let blank_name = app
        .send(
            Method::PATCH,
            "/users/me/profile",
            Some("tok"),
            Some(json!({ "user_name": "" })),
        )
        .await;
    assert_eq!(blank_name.status, StatusCode::BAD_REQUEST);

    app.issue_token("gone", UserId::new(404), UserRole::Customer)
        .await;
    let gone = app
        .send(
            Method::PATCH,
            "/users/me/profile",
            Some("gone"),
            Some(json!({ "note": "x" })),
        )
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_outage_is_internal_without_details() {
    let app = TestApp::new();
    app.store.set_unavailable(true);

    let response = app
        .send(Method::GET, "/users/1", None, None)
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "Internal server error");
}
