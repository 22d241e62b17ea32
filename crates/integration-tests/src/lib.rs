//! Integration tests for the user directory.
//!
//! Tests drive the full axum router in-process with
//! `tower::ServiceExt::oneshot`, backed by the in-memory account store and
//! a static token table in place of the authentication service.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p user-directory-integration-tests
//! ```

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use user_directory_core::{Email, UserId, UserRole};
use user_directory_server::claims::StaticClaimsResolver;
use user_directory_server::models::NewUser;
use user_directory_server::routes;
use user_directory_server::services::IdentityService;
use user_directory_server::state::AppState;
use user_directory_server::store::{InMemoryUserStore, UserStore};

/// A router over in-memory collaborators.
pub struct TestApp {
    router: Router,
    /// Backing store, shared with the router.
    pub store: InMemoryUserStore,
    /// Token table, shared with the router.
    pub claims: StaticClaimsResolver,
}

/// Status, `x-request-id`, and JSON body of a response.
pub struct TestResponse {
    pub status: StatusCode,
    pub request_id: Option<String>,
    pub body: Value,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Build an app with the default batch concurrency.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lookup_concurrency(16)
    }

    /// Build an app with a specific batch concurrency.
    #[must_use]
    pub fn with_lookup_concurrency(limit: usize) -> Self {
        let store = InMemoryUserStore::new();
        let claims = StaticClaimsResolver::new();
        let identity =
            IdentityService::new(store.clone(), claims.clone()).with_lookup_concurrency(limit);

        Self {
            router: routes::app(AppState::new(identity)),
            store,
            claims,
        }
    }

    /// Send one request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            request_id,
            body,
        }
    }

    /// Register an account over HTTP and return its id.
    ///
    /// # Panics
    ///
    /// Panics if registration fails.
    pub async fn register(&self, email: &str, user_name: &str, password: &str) -> UserId {
        let response = self
            .send(
                Method::POST,
                "/users",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "user_name": user_name,
                    "password": password,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        self.store
            .get_by_email(&Email::parse(email).expect("valid email"))
            .await
            .expect("store available")
            .expect("account exists")
            .id
    }

    /// Issue a bearer token that resolves to `id` with `role`.
    pub async fn issue_token(&self, token: &str, id: UserId, role: UserRole) {
        self.claims.insert(token, id.to_string(), role).await;
    }

    /// Insert `count` accounts straight into the store, skipping password
    /// hashing. The accounts cannot log in.
    ///
    /// # Panics
    ///
    /// Panics if the store rejects an insert.
    pub async fn seed(&self, count: usize) -> Vec<UserId> {
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let user = self
                .store
                .create(&NewUser {
                    email: Email::parse(&format!("user{i}@seed.test")).expect("valid email"),
                    user_name: format!("user{i}"),
                    hashed_password: SecretString::from("unhashed"),
                })
                .await
                .expect("store available");
            ids.push(user.id);
        }
        ids
    }
}
