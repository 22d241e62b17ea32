//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::claims::ClaimsResolver;
use crate::state::AppState;
use crate::store::UserStore;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the account store is not reachable.
pub async fn readiness<S: UserStore, C: ClaimsResolver>(
    State(state): State<AppState<S, C>>,
) -> StatusCode {
    if state.store().ready().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
