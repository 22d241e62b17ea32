//! Directory configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DIRECTORY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `DIRECTORY_HOST` - Bind address (default: 0.0.0.0)
//! - `DIRECTORY_PORT` - Listen port (default: 8080)
//! - `AUTH_SERVICE_URL` - Authentication service base URL (default: <http://auth-service:8080>)
//! - `CLAIMS_TIMEOUT_SECS` - Claims request timeout in seconds (default: 5)
//! - `LOOKUP_CONCURRENCY` - Max concurrent reads per batch lookup (default: 16)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::services::identity::DEFAULT_LOOKUP_CONCURRENCY;

const DEFAULT_AUTH_SERVICE_URL: &str = "http://auth-service:8080";
const DEFAULT_CLAIMS_TIMEOUT_SECS: u64 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Directory service configuration.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Authentication service client settings
    pub claims: ClaimsServiceConfig,
    /// Max concurrent store reads per batch lookup
    pub lookup_concurrency: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Authentication service client settings.
#[derive(Debug, Clone)]
pub struct ClaimsServiceConfig {
    /// Base URL; claims are fetched from `{base_url}/claims`
    pub base_url: Url,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl DirectoryConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = var("DIRECTORY_DATABASE_URL")
            .or_else(|| var("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("DIRECTORY_DATABASE_URL".to_string()))?;

        let host = parse_var(&var, "DIRECTORY_HOST", "0.0.0.0")?;
        let port = parse_var(&var, "DIRECTORY_PORT", "8080")?;

        let base_url = parse_var(&var, "AUTH_SERVICE_URL", DEFAULT_AUTH_SERVICE_URL)?;
        let timeout_secs: u64 = parse_var(
            &var,
            "CLAIMS_TIMEOUT_SECS",
            &DEFAULT_CLAIMS_TIMEOUT_SECS.to_string(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CLAIMS_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let lookup_concurrency: usize = parse_var(
            &var,
            "LOOKUP_CONCURRENCY",
            &DEFAULT_LOOKUP_CONCURRENCY.to_string(),
        )?;
        if lookup_concurrency == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "LOOKUP_CONCURRENCY".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            host,
            port,
            claims: ClaimsServiceConfig {
                base_url,
                timeout_secs,
            },
            lookup_concurrency,
            sentry_dsn: var("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: var("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to a default when unset.
fn parse_var<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    var(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
