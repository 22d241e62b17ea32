//! Account roles and the supplier elevation transition.

use serde::{Deserialize, Serialize};

/// Role of an account.
///
/// Ordered by privilege. The only transition this system performs is
/// `Customer -> Supplier`; every other role is terminal for elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "directory.user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Default role for every new account.
    #[default]
    Customer,
    /// Can list goods for sale.
    Supplier,
    /// Operator account.
    Admin,
}

/// Returned when elevation is requested for a role that is already past `Customer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("role {current} cannot be elevated to supplier")]
pub struct AlreadyElevated {
    /// The role the account holds.
    pub current: UserRole,
}

impl UserRole {
    /// Apply the supplier elevation.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadyElevated`] unless the role is exactly `Customer`.
    pub const fn elevate_to_supplier(self) -> Result<Self, AlreadyElevated> {
        match self {
            Self::Customer => Ok(Self::Supplier),
            Self::Supplier | Self::Admin => Err(AlreadyElevated { current: self }),
        }
    }

    /// Wire and database name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "supplier" => Ok(Self::Supplier),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_elevates_once() {
        let role = UserRole::Customer.elevate_to_supplier().unwrap();
        assert_eq!(role, UserRole::Supplier);
        assert_eq!(
            role.elevate_to_supplier(),
            Err(AlreadyElevated {
                current: UserRole::Supplier
            })
        );
    }

    #[test]
    fn test_admin_cannot_elevate() {
        assert!(UserRole::Admin.elevate_to_supplier().is_err());
    }

    #[test]
    fn test_roles_are_ordered() {
        assert!(UserRole::Customer < UserRole::Supplier);
        assert!(UserRole::Supplier < UserRole::Admin);
    }

    #[test]
    fn test_string_forms_agree() {
        for role in [UserRole::Customer, UserRole::Supplier, UserRole::Admin] {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
        assert!("root".parse::<UserRole>().is_err());
    }
}
