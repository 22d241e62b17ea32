//! The account storage contract.
//!
//! [`IdentityService`](crate::services::IdentityService) only talks to
//! storage through [`UserStore`]. Production uses
//! [`UserRepository`](crate::db::UserRepository); tests use
//! [`InMemoryUserStore`].

pub mod memory;

use std::future::Future;

use user_directory_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::models::{NewUser, ProfileUpdate, User};

pub use memory::InMemoryUserStore;

/// Outcome of a conditional `customer -> supplier` write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleTransition {
    /// The row was `customer` and is now `supplier`.
    Elevated,
    /// The row exists but was no longer `customer`.
    AlreadyElevated,
    /// No row with that id.
    Missing,
}

/// Durable account records.
///
/// Implementations must enforce email uniqueness themselves and make
/// [`register_supplier`](Self::register_supplier) a single atomic
/// compare-and-set on the role.
pub trait UserStore: Send + Sync + 'static {
    /// Insert a new account.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    fn create(&self, user: &NewUser) -> impl Future<Output = Result<User, RepositoryError>> + Send;

    /// Fetch an account by id.
    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Fetch an account by exact email.
    fn get_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Write the supplied profile fields, leaving absent ones untouched.
    ///
    /// Returns `RepositoryError::NotFound` if no row matched.
    fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Move the account from `customer` to `supplier` if and only if it is
    /// currently `customer`.
    fn register_supplier(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<RoleTransition, RepositoryError>> + Send;

    /// Whether the backing storage currently accepts queries.
    fn ready(&self) -> impl Future<Output = bool> + Send;
}
