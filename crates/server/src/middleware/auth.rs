//! Caller context extraction.
//!
//! The directory does not authenticate requests itself. Handlers that act
//! on behalf of the caller take a [`Caller`], which captures the raw
//! `Authorization` and `x-request-id` headers for the claims resolver.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::request_id::REQUEST_ID_HEADER;
use crate::claims::CallerContext;

/// Extractor for the caller's opaque authentication context.
///
/// Never rejects: a missing `Authorization` header is left for the claims
/// resolver to refuse.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(State(state): State<AppState<S, C>>, Caller(caller): Caller) -> Result<Json<UserView>> {
///     let user = state.identity().get_self(&caller).await?;
///     Ok(Json(UserView::full(&user)))
/// }
/// ```
pub struct Caller(pub CallerContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(String::from)
        };

        Ok(Self(CallerContext::new(
            header(AUTHORIZATION.as_str()),
            header(REQUEST_ID_HEADER),
        )))
    }
}
