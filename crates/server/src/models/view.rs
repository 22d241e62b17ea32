//! Wire representations of accounts.
//!
//! Each read path exposes a different slice of the account. None of them
//! carries the password digest.

use serde::{Deserialize, Serialize};

use user_directory_core::{UserId, UserRole};

use super::user::User;

/// An account as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<AddressView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Public profile block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    pub user_name: String,
    pub phone: Option<String>,
}

/// Address block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressView {
    pub address: Option<String>,
    pub note: Option<String>,
}

impl UserView {
    /// Everything a caller may see about an account.
    #[must_use]
    pub fn full(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            role: Some(user.role),
            active_status: Some(user.active_status),
            profile: Some(ProfileView {
                user_name: user.user_name.clone(),
                phone: user.profile.phone.clone(),
            }),
            address: vec![AddressView {
                address: user.profile.address.clone(),
                note: user.profile.note.clone(),
            }],
            gender: user.profile.gender.clone(),
        }
    }

    /// Identity and authorization fields only, returned by a credential check.
    #[must_use]
    pub fn credentials(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            role: Some(user.role),
            active_status: Some(user.active_status),
            profile: None,
            address: Vec::new(),
            gender: None,
        }
    }

    /// Compact form used by batch lookups.
    #[must_use]
    pub fn listing(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            role: None,
            active_status: None,
            profile: Some(ProfileView {
                user_name: user.user_name.clone(),
                phone: None,
            }),
            address: Vec::new(),
            gender: None,
        }
    }
}
