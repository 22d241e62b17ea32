//! In-memory [`UserStore`] used by tests and local tooling.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;

use user_directory_core::{Email, UserId, UserRole};

use super::{RoleTransition, UserStore};
use crate::db::RepositoryError;
use crate::models::{NewUser, Profile, ProfileUpdate, User};

/// Map-backed store with the same uniqueness and role rules as the
/// `PostgreSQL` repository.
///
/// Cheap to clone; clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    state: RwLock<State>,
    unavailable: AtomicBool,
    broken_ids: RwLock<HashSet<UserId>>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    users: HashMap<UserId, User>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make lookups of one id fail with a database error.
    pub async fn break_id(&self, id: UserId) {
        self.inner.broken_ids.write().await.insert(id);
    }

    /// Overwrite an account's role directly, bypassing the elevation rules.
    pub async fn set_role(&self, id: UserId, role: UserRole) -> Result<(), RepositoryError> {
        let mut state = self.inner.state.write().await;
        let user = state.users.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        user.role = role;
        Ok(())
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.inner.state.read().await.users.len()
    }

    /// Whether the store holds no accounts.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

impl UserStore for InMemoryUserStore {
    async fn ready(&self) -> bool {
        self.check_available().is_ok()
    }

    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        self.check_available()?;
        let mut state = self.inner.state.write().await;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        state.next_id += 1;
        let now = Utc::now();
        let created = User {
            id: UserId::new(state.next_id),
            email: user.email.clone(),
            user_name: user.user_name.clone(),
            role: UserRole::Customer,
            active_status: true,
            hashed_password: user.hashed_password.clone(),
            password_updated_at: now,
            created_at: now,
            profile: Profile::default(),
        };
        state.users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.check_available()?;
        if self.inner.broken_ids.read().await.contains(&id) {
            return Err(RepositoryError::DataCorruption(format!(
                "row {id} is unreadable"
            )));
        }
        Ok(self.inner.state.read().await.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        self.check_available()?;
        let state = self.inner.state.read().await;
        Ok(state.users.values().find(|u| &u.email == email).cloned())
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut state = self.inner.state.write().await;
        let user = state.users.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        update.apply_to(user);
        Ok(())
    }

    async fn register_supplier(&self, id: UserId) -> Result<RoleTransition, RepositoryError> {
        self.check_available()?;
        let mut state = self.inner.state.write().await;
        let Some(user) = state.users.get_mut(&id) else {
            return Ok(RoleTransition::Missing);
        };

        match user.role.elevate_to_supplier() {
            Ok(role) => {
                user.role = role;
                Ok(RoleTransition::Elevated)
            }
            Err(_) => Ok(RoleTransition::AlreadyElevated),
        }
    }
}
