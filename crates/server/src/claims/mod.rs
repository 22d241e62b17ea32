//! Caller identity resolution.
//!
//! The directory never inspects bearer tokens. It captures the caller's
//! authentication context as-is, hands it to the authentication service,
//! and trusts only the claim bundle that comes back.
//!
//! - [`HttpClaimsResolver`] - production client for the authentication service
//! - [`StaticClaimsResolver`] - token table for tests and local runs
//! - [`NoClaims`] - for tools that never authenticate a caller

mod fixed;
mod http;

pub use fixed::{NoClaims, StaticClaimsResolver};
pub use http::HttpClaimsResolver;

use std::future::Future;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use user_directory_core::{UserId, UserRole};

/// Errors from resolving the caller's claims.
#[derive(Debug, Clone, Error)]
pub enum ClaimsError {
    /// The authentication service rejected the caller's credential.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The authentication service could not be reached or answered badly.
    #[error("authentication service unavailable: {0}")]
    Unavailable(String),

    /// The authentication service reported a malformed request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// A resolved statement of who is calling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    /// Subject id as issued by the authentication service.
    pub id: String,
    /// Role recorded in the claim.
    #[serde(alias = "user_role")]
    pub role: UserRole,
}

impl IdentityClaim {
    /// Parse the subject into an account id.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the subject is not a decimal `i64`.
    pub fn user_id(&self) -> Result<UserId, std::num::ParseIntError> {
        self.id.parse()
    }
}

/// Opaque authentication context captured from an inbound request.
///
/// Forwarded verbatim to the authentication service.
#[derive(Debug, Clone, Default)]
pub struct CallerContext {
    authorization: Option<SecretString>,
    request_id: Option<String>,
}

impl CallerContext {
    /// Build a context from raw header values.
    #[must_use]
    pub fn new(authorization: Option<String>, request_id: Option<String>) -> Self {
        Self {
            authorization: authorization.map(SecretString::from),
            request_id,
        }
    }

    /// Shorthand for a context carrying only an `Authorization` value.
    #[must_use]
    pub fn bearer(token: &str) -> Self {
        Self::new(Some(format!("Bearer {token}")), None)
    }

    /// The `Authorization` header value, if the caller sent one.
    #[must_use]
    pub const fn authorization(&self) -> Option<&SecretString> {
        self.authorization.as_ref()
    }

    /// The request id for correlation, if any.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

/// Resolves a caller context into a claim.
///
/// Implementations must not cache: every call reflects the authentication
/// service's current view of the credential.
pub trait ClaimsResolver: Send + Sync + 'static {
    /// Resolve the caller's claim bundle.
    fn resolve(
        &self,
        caller: &CallerContext,
    ) -> impl Future<Output = Result<IdentityClaim, ClaimsError>> + Send;
}
