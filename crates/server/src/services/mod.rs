//! Business logic services.
//!
//! # Services
//!
//! - `identity` - Account creation, login, profile, supplier elevation, batch lookup
//! - `vault` - Argon2 password hashing

pub mod identity;
pub mod vault;

pub use identity::{ErrorKind, IdentityError, IdentityService};
pub use vault::{CredentialVault, VaultError};
