//! Application state shared across handlers.

use std::sync::Arc;

use crate::claims::ClaimsResolver;
use crate::services::IdentityService;
use crate::store::UserStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// identity service and, through it, the account store.
pub struct AppState<S, C> {
    inner: Arc<AppStateInner<S, C>>,
}

struct AppStateInner<S, C> {
    identity: IdentityService<S, C>,
}

impl<S, C> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: UserStore, C: ClaimsResolver> AppState<S, C> {
    /// Create a new application state.
    #[must_use]
    pub fn new(identity: IdentityService<S, C>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { identity }),
        }
    }

    /// Get a reference to the identity service.
    #[must_use]
    pub fn identity(&self) -> &IdentityService<S, C> {
        &self.inner.identity
    }

    /// Get a reference to the account store.
    #[must_use]
    pub fn store(&self) -> &S {
        self.inner.identity.store()
    }
}
