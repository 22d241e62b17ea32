//! Identity service error types.

use thiserror::Error;

use crate::claims::ClaimsError;
use crate::db::RepositoryError;
use crate::services::vault::VaultError;

/// Errors that can occur during identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] user_directory_core::EmailError),

    /// The claim subject is not a numeric account id.
    #[error("invalid user claims: {0}")]
    InvalidSubject(String),

    /// Caller-supplied data failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Password did not match the stored digest.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// No account matched.
    #[error("user not found")]
    UserNotFound,

    /// Email is already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The account is already a supplier or admin.
    #[error("registration failed, you have already registered as a supplier")]
    AlreadySupplier,

    /// Caller identity could not be established.
    #[error(transparent)]
    Claims(#[from] ClaimsError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error(transparent)]
    PasswordHash(#[from] VaultError),
}

/// Coarse error classes shared by every transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed caller-supplied data, including a wrong password.
    InvalidArgument,
    /// No matching account.
    NotFound,
    /// Caller identity could not be established.
    Unauthenticated,
    /// The request conflicts with current state.
    Conflict,
    /// Store or hashing failure.
    Internal,
}

impl IdentityError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEmail(_)
            | Self::InvalidSubject(_)
            | Self::Validation(_)
            | Self::InvalidCredentials
            | Self::Claims(ClaimsError::InvalidRequest(_)) => ErrorKind::InvalidArgument,
            Self::UserNotFound => ErrorKind::NotFound,
            Self::Claims(ClaimsError::Unauthenticated(_) | ClaimsError::Unavailable(_)) => {
                ErrorKind::Unauthenticated
            }
            Self::UserAlreadyExists | Self::AlreadySupplier => ErrorKind::Conflict,
            Self::Repository(_) | Self::PasswordHash(_) => ErrorKind::Internal,
        }
    }
}
