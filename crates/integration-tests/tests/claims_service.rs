//! The HTTP claims client against a stand-in authentication service.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    http::{HeaderMap, Method, Request, StatusCode, header},
    routing::get,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

use user_directory_server::claims::{
    CallerContext, ClaimsError, ClaimsResolver, HttpClaimsResolver,
};
use user_directory_server::config::ClaimsServiceConfig;
use user_directory_server::routes;
use user_directory_server::services::IdentityService;
use user_directory_server::state::AppState;
use user_directory_server::store::InMemoryUserStore;

type Seen = Arc<Mutex<Vec<(Option<String>, Option<String>)>>>;

/// Serve `/claims` on an ephemeral port. `Bearer good` resolves to subject
/// 1 as a customer, `Bearer bad-request` is a 400, anything else is a 401.
async fn spawn_auth_service() -> (Url, Seen) {
    let seen: Seen = Arc::default();
    let recorder = Arc::clone(&seen);

    let app = Router::new().route(
        "/claims",
        get(move |headers: HeaderMap| {
            let recorder = Arc::clone(&recorder);
            async move {
                let value = |name: &str| {
                    headers
                        .get(name)
                        .and_then(|v| v.to_str().ok())
                        .map(String::from)
                };
                let auth = value("authorization");
                recorder
                    .lock()
                    .unwrap()
                    .push((auth.clone(), value("x-request-id")));

                match auth.as_deref() {
                    Some("Bearer good") => {
                        (StatusCode::OK, Json(json!({ "id": "1", "role": "customer" })))
                    }
                    Some("Bearer bad-request") => {
                        (StatusCode::BAD_REQUEST, Json(json!({ "error": "malformed" })))
                    }
                    _ => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "expired" }))),
                }
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{addr}")).unwrap(), seen)
}

fn resolver(base_url: Url) -> HttpClaimsResolver {
    HttpClaimsResolver::new(&ClaimsServiceConfig {
        base_url,
        timeout_secs: 2,
    })
    .unwrap()
}

#[tokio::test]
async fn test_headers_are_forwarded_verbatim() {
    let (url, seen) = spawn_auth_service().await;
    let resolver = resolver(url);

    let caller = CallerContext::new(Some("Bearer good".to_owned()), Some("rid-7".to_owned()));
    let claim = resolver.resolve(&caller).await.unwrap();

    assert_eq!(claim.id, "1");
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &[(Some("Bearer good".to_owned()), Some("rid-7".to_owned()))]
    );
}

#[tokio::test]
async fn test_failures_are_classified() {
    let (url, _) = spawn_auth_service().await;
    let resolver = resolver(url);

    assert!(matches!(
        resolver.resolve(&CallerContext::bearer("stale")).await,
        Err(ClaimsError::Unauthenticated(_))
    ));
    assert!(matches!(
        resolver.resolve(&CallerContext::bearer("bad-request")).await,
        Err(ClaimsError::InvalidRequest(_))
    ));
}

#[tokio::test]
async fn test_router_forwards_request_id_to_auth_service() {
    let (url, seen) = spawn_auth_service().await;
    let store = InMemoryUserStore::new();
    let app = routes::app(AppState::new(IdentityService::new(store, resolver(url))));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/users/me")
                .header(header::AUTHORIZATION, "Bearer good")
                .header("x-request-id", "trace-abc")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Subject 1 is not in the empty store.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "not_found");

    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &[(
            Some("Bearer good".to_owned()),
            Some("trace-abc".to_owned())
        )]
    );
}
