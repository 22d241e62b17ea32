//! Subcommand implementations.

pub mod migrate;
pub mod user;

use thiserror::Error;

use user_directory_server::config::ConfigError;
use user_directory_server::services::IdentityError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The identity service rejected the request.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}
