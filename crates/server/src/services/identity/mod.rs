//! Identity service.
//!
//! Account creation, credential checks, profile reads and updates, supplier
//! elevation, and batch lookup. Storage and caller resolution are injected.

mod error;

pub use error::{ErrorKind, IdentityError};

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tracing::instrument;

use user_directory_core::{Email, UserId, UserRole};

use crate::claims::{CallerContext, ClaimsResolver};
use crate::db::RepositoryError;
use crate::models::{NewUser, ProfileUpdate, User};
use crate::services::vault::CredentialVault;
use crate::store::{RoleTransition, UserStore};

/// Default number of concurrent store reads per batch lookup.
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 16;

/// Confirmation returned by a profile update.
pub const PROFILE_UPDATED: &str = "profile updated successfully";

/// Confirmation returned by a supplier registration.
pub const SUPPLIER_REGISTERED: &str = "registration successful, you are now a supplier";

/// Identity service.
///
/// Owns its collaborators; share it behind an `Arc`.
pub struct IdentityService<S, C> {
    store: S,
    claims: C,
    vault: CredentialVault,
    lookup_concurrency: usize,
}

impl<S: UserStore, C: ClaimsResolver> IdentityService<S, C> {
    /// Create a new identity service.
    #[must_use]
    pub fn new(store: S, claims: C) -> Self {
        Self {
            store,
            claims,
            vault: CredentialVault::new(),
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
        }
    }

    /// Bound the number of store reads a single batch lookup keeps in flight.
    ///
    /// Values below one are raised to one.
    #[must_use]
    pub fn with_lookup_concurrency(mut self, limit: usize) -> Self {
        self.lookup_concurrency = limit.max(1);
        self
    }

    /// The account store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Register a new account.
    ///
    /// Uniqueness is left to the store so two concurrent registrations of
    /// the same email cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidEmail` if the email format is invalid.
    /// Returns `IdentityError::Validation` if the username or password is empty.
    /// Returns `IdentityError::UserAlreadyExists` if the email is already registered.
    /// Returns `IdentityError::PasswordHash` if hashing fails.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn create_account(
        &self,
        email: &str,
        user_name: &str,
        password: &str,
    ) -> Result<String, IdentityError> {
        let email = Email::parse(email)?;

        if user_name.trim().is_empty() {
            return Err(IdentityError::Validation(
                "user_name cannot be empty".to_owned(),
            ));
        }
        if password.is_empty() {
            return Err(IdentityError::Validation(
                "password cannot be empty".to_owned(),
            ));
        }

        let hashed_password = self.vault.hash(password)?;

        let user = self
            .store
            .create(&NewUser {
                email,
                user_name: user_name.to_owned(),
                hashed_password,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => IdentityError::UserAlreadyExists,
                other => IdentityError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "account created");

        Ok(format!(
            "user {} is created, please check your email({}) to complete the registration",
            user.user_name, user.email
        ))
    }

    /// Check an email and password.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::UserNotFound` if no account has this email.
    /// A malformed email can never match a stored account, so it is
    /// reported the same way.
    /// Returns `IdentityError::InvalidCredentials` if the password is wrong.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, IdentityError> {
        let email = Email::parse(email).map_err(|_| IdentityError::UserNotFound)?;

        let user = self
            .store
            .get_by_email(&email)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        if !self.vault.verify(password, &user.hashed_password) {
            tracing::debug!(user_id = %user.id, "password mismatch");
            return Err(IdentityError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Get an account by id.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::UserNotFound` if the account doesn't exist.
    pub async fn get_by_id(&self, id: UserId) -> Result<User, IdentityError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(IdentityError::UserNotFound)
    }

    // =========================================================================
    // Caller-scoped operations
    // =========================================================================

    /// Get the calling account.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Claims` if the caller cannot be resolved.
    /// Returns `IdentityError::InvalidSubject` if the claim id is not numeric.
    /// Returns `IdentityError::UserNotFound` if the account doesn't exist.
    pub async fn get_self(&self, caller: &CallerContext) -> Result<User, IdentityError> {
        let (id, _) = self.resolve_caller(caller).await?;
        self.get_by_id(id).await
    }

    /// Update the calling account's profile.
    ///
    /// Only supplied fields are written. A supplied empty string clears
    /// phone, address, or note; an empty username is rejected. The caller
    /// is resolved before the update is validated.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Claims` if the caller cannot be resolved.
    /// Returns `IdentityError::Validation` if nothing is supplied or the username is empty.
    /// Returns `IdentityError::UserNotFound` if the account no longer exists.
    /// Returns `IdentityError::Repository` if the write fails.
    pub async fn update_profile(
        &self,
        caller: &CallerContext,
        update: &ProfileUpdate,
    ) -> Result<&'static str, IdentityError> {
        let (id, _) = self.resolve_caller(caller).await?;

        if update.is_empty() {
            return Err(IdentityError::Validation(
                "no profile fields supplied".to_owned(),
            ));
        }
        if update
            .user_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(IdentityError::Validation(
                "user_name cannot be empty".to_owned(),
            ));
        }

        self.store
            .update_profile(id, update)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => IdentityError::UserNotFound,
                other => {
                    tracing::error!(user_id = %id, error = %other, "profile update failed");
                    IdentityError::Repository(other)
                }
            })?;

        tracing::info!(user_id = %id, "profile updated");

        Ok(PROFILE_UPDATED)
    }

    /// Elevate the calling account from customer to supplier.
    ///
    /// The claim role is checked first; the store then re-checks it
    /// atomically, so a stale claim or a concurrent elevation still yields
    /// exactly one success.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Claims` if the caller cannot be resolved.
    /// Returns `IdentityError::AlreadySupplier` if the account is past `customer`.
    /// Returns `IdentityError::InvalidSubject` if the claim id is not numeric.
    /// Returns `IdentityError::UserNotFound` if the account doesn't exist.
    /// Returns `IdentityError::Repository` if the write fails.
    pub async fn register_supplier(
        &self,
        caller: &CallerContext,
    ) -> Result<&'static str, IdentityError> {
        let claim = self.claims.resolve(caller).await?;

        claim
            .role
            .elevate_to_supplier()
            .map_err(|_| IdentityError::AlreadySupplier)?;

        let id = claim
            .user_id()
            .map_err(|e| IdentityError::InvalidSubject(e.to_string()))?;

        match self.store.register_supplier(id).await? {
            RoleTransition::Elevated => {
                tracing::info!(user_id = %id, role = %UserRole::Supplier, "role elevated");
                Ok(SUPPLIER_REGISTERED)
            }
            RoleTransition::AlreadyElevated => Err(IdentityError::AlreadySupplier),
            RoleTransition::Missing => Err(IdentityError::UserNotFound),
        }
    }

    // =========================================================================
    // Batch lookup
    // =========================================================================

    /// Look up many accounts at once.
    ///
    /// Each distinct id is read concurrently, at most `lookup_concurrency`
    /// at a time. Results are gathered by this future alone, so no
    /// collection is shared between lookups. Missing ids and ids whose read
    /// fails are left out. Order is unspecified.
    ///
    /// Dropping the returned future cancels every outstanding read.
    #[instrument(skip_all, fields(requested = ids.len()))]
    pub async fn get_many(&self, ids: &[UserId]) -> Vec<User> {
        let mut seen = HashSet::with_capacity(ids.len());
        let unique: Vec<UserId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let users: Vec<User> = stream::iter(unique)
            .map(|id| async move { (id, self.store.get_by_id(id).await) })
            .buffer_unordered(self.lookup_concurrency)
            .filter_map(|(id, result)| async move {
                match result {
                    Ok(user) => user,
                    Err(e) => {
                        tracing::warn!(user_id = %id, error = %e, "batch lookup skipped id");
                        None
                    }
                }
            })
            .collect()
            .await;

        tracing::debug!(found = users.len(), "batch lookup complete");
        users
    }

    /// Resolve the caller and parse the claim subject.
    async fn resolve_caller(
        &self,
        caller: &CallerContext,
    ) -> Result<(UserId, UserRole), IdentityError> {
        let claim = self.claims.resolve(caller).await?;
        let id = claim
            .user_id()
            .map_err(|e| IdentityError::InvalidSubject(e.to_string()))?;
        Ok((id, claim.role))
    }
}
