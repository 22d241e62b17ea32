//! HTTP route handlers for the directory.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health               - Liveness check
//! GET   /health/ready         - Readiness check (store reachable)
//! GET   /ping                 - Returns {"message":"pong"}
//!
//! # Accounts
//! POST  /users                - Create account
//! POST  /users/login          - Check email and password
//! POST  /users/batch          - Look up many accounts by id
//! GET   /users/{id}           - Get account by id
//!
//! # Caller-scoped (Authorization forwarded to the authentication service)
//! GET   /users/me             - Get the calling account
//! PATCH /users/me/profile     - Update the calling account's profile
//! POST  /users/me/supplier    - Become a supplier
//! ```

pub mod health;
pub mod users;

use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::claims::ClaimsResolver;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use crate::store::UserStore;

/// Build the complete application router with tracing and request IDs.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app<S: UserStore, C: ClaimsResolver>(state: AppState<S, C>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness::<S, C>))
        .merge(routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Create the API routes router.
pub fn routes<S: UserStore, C: ClaimsResolver>() -> Router<AppState<S, C>> {
    Router::new()
        .route("/ping", get(users::ping))
        .nest("/users", user_routes())
}

/// Create the account routes router.
pub fn user_routes<S: UserStore, C: ClaimsResolver>() -> Router<AppState<S, C>> {
    Router::new()
        .route("/", post(users::create_user::<S, C>))
        .route("/login", post(users::login::<S, C>))
        .route("/batch", post(users::get_many::<S, C>))
        .route("/me", get(users::get_self::<S, C>))
        .route("/me/profile", patch(users::update_profile::<S, C>))
        .route("/me/supplier", post(users::register_supplier::<S, C>))
        .route("/{id}", get(users::get_user::<S, C>))
}
