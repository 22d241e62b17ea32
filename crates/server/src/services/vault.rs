//! Password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Hashing failed inside the primitive.
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct VaultError(String);

/// One-way password hashing and verification.
///
/// Argon2id with the crate's default parameters. The parameters are fixed
/// so every digest costs the same to verify.
#[derive(Clone, Default)]
pub struct CredentialVault {
    argon2: Argon2<'static>,
}

impl CredentialVault {
    /// Create a vault with the fixed hashing parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a plaintext password into a salted PHC string.
    ///
    /// # Errors
    ///
    /// Returns `VaultError` if the primitive rejects the input. No digest is
    /// produced in that case.
    pub fn hash(&self, plaintext: &str) -> Result<SecretString, VaultError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| SecretString::from(hash.to_string()))
            .map_err(|e| VaultError(e.to_string()))
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// A digest that does not parse never verifies.
    #[must_use]
    pub fn verify(&self, plaintext: &str, digest: &SecretString) -> bool {
        let Ok(parsed) = PasswordHash::new(digest.expose_secret()) else {
            return false;
        };

        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let vault = CredentialVault::new();
        let digest = vault.hash("pw").unwrap();
        assert!(vault.verify("pw", &digest));
        assert!(!vault.verify("wrong", &digest));
    }

    #[test]
    fn test_hashes_are_salted() {
        let vault = CredentialVault::new();
        let a = vault.hash("same password").unwrap();
        let b = vault.hash("same password").unwrap();
        assert_ne!(a.expose_secret(), b.expose_secret());
        assert!(vault.verify("same password", &a));
        assert!(vault.verify("same password", &b));
    }

    #[test]
    fn test_digest_is_argon2id_phc() {
        let digest = CredentialVault::new().hash("pw").unwrap();
        assert!(digest.expose_secret().starts_with("$argon2id$"));
        assert!(!digest.expose_secret().contains("pw$"));
    }

    #[test]
    fn test_garbage_digest_never_verifies() {
        let vault = CredentialVault::new();
        assert!(!vault.verify("pw", &SecretString::from("not-a-digest")));
        assert!(!vault.verify("", &SecretString::from("")));
    }

    #[test]
    fn test_distinct_passwords_do_not_cross_verify() {
        let vault = CredentialVault::new();
        let passwords = ["alpha", "Alpha", "alpha "];
        let digests: Vec<_> = passwords.iter().map(|p| vault.hash(p).unwrap()).collect();

        for (i, p) in passwords.iter().enumerate() {
            for (j, d) in digests.iter().enumerate() {
                assert_eq!(vault.verify(p, d), i == j, "{p} vs digest {j}");
            }
        }
    }
}
