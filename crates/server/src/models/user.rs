//! Account domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use user_directory_core::{Email, UserId, UserRole};

/// A directory account (domain type).
///
/// `Debug` output never contains the password digest: it is held as a
/// [`SecretString`], which redacts itself.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique account ID.
    pub id: UserId,
    /// Login email, unique and case-sensitive.
    pub email: Email,
    /// Public username.
    pub user_name: String,
    /// Current role.
    pub role: UserRole,
    /// Whether the account is active.
    pub active_status: bool,
    /// Argon2 PHC string for the account password.
    pub hashed_password: SecretString,
    /// When the password was last set.
    pub password_updated_at: DateTime<Utc>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Optional profile fields.
    pub profile: Profile,
}

/// Optional profile scalars.
///
/// `None` means the field was never set; `Some("")` means it was cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

/// Input for creating an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub user_name: String,
    pub hashed_password: SecretString,
}

/// A partial profile update.
///
/// Only fields that are `Some` are written. `Some(String::new())` clears a
/// field to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub user_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

impl ProfileUpdate {
    /// Returns `true` when no field is supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.user_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.note.is_none()
    }

    /// Apply the supplied fields to an account in place.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(user_name) = &self.user_name {
            user.user_name.clone_from(user_name);
        }
        if let Some(phone) = &self.phone {
            user.profile.phone = Some(phone.clone());
        }
        if let Some(address) = &self.address {
            user.profile.address = Some(address.clone());
        }
        if let Some(note) = &self.note {
            user.profile.note = Some(note.clone());
        }
    }
}
