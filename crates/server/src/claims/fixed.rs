//! Resolvers that do not call out to the network.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use secrecy::ExposeSecret;
use tokio::sync::RwLock;

use user_directory_core::UserRole;

use super::{CallerContext, ClaimsError, ClaimsResolver, IdentityClaim};

/// Maps bearer tokens to claims from an in-memory table.
///
/// Tokens are matched against the full `Authorization` value with the
/// `Bearer ` prefix stripped. Unknown or missing tokens are rejected the
/// same way the authentication service rejects them.
#[derive(Clone, Default)]
pub struct StaticClaimsResolver {
    inner: Arc<StaticInner>,
}

#[derive(Default)]
struct StaticInner {
    tokens: RwLock<HashMap<String, IdentityClaim>>,
    calls: AtomicUsize,
}

impl StaticClaimsResolver {
    /// Create an empty token table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token for a subject id and role.
    pub async fn insert(&self, token: &str, subject: impl Into<String>, role: UserRole) {
        self.inner.tokens.write().await.insert(
            token.to_owned(),
            IdentityClaim {
                id: subject.into(),
                role,
            },
        );
    }

    /// Number of resolutions performed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }
}

impl ClaimsResolver for StaticClaimsResolver {
    async fn resolve(&self, caller: &CallerContext) -> Result<IdentityClaim, ClaimsError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);

        let header = caller
            .authorization()
            .ok_or_else(|| ClaimsError::Unauthenticated("missing credentials".to_owned()))?;
        let value = header.expose_secret();
        let token = value.strip_prefix("Bearer ").unwrap_or(value);

        self.inner
            .tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| ClaimsError::Unauthenticated("invalid or expired token".to_owned()))
    }
}

/// Resolver for processes with no authentication service.
///
/// Every resolution fails; operations that need a caller are unavailable.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoClaims;

impl ClaimsResolver for NoClaims {
    async fn resolve(&self, _caller: &CallerContext) -> Result<IdentityClaim, ClaimsError> {
        Err(ClaimsError::Unavailable(
            "no authentication service configured".to_owned(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_token_resolves() {
        let resolver = StaticClaimsResolver::new();
        resolver.insert("tok", "7", UserRole::Customer).await;

        let claim = resolver.resolve(&CallerContext::bearer("tok")).await.unwrap();
        assert_eq!(claim.id, "7");
        assert_eq!(resolver.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_and_unknown_tokens_are_unauthenticated() {
        let resolver = StaticClaimsResolver::new();
        assert!(matches!(
            resolver.resolve(&CallerContext::default()).await,
            Err(ClaimsError::Unauthenticated(_))
        ));
        assert!(matches!(
            resolver.resolve(&CallerContext::bearer("nope")).await,
            Err(ClaimsError::Unauthenticated(_))
        ));
    }
}
