//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! ud-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DIRECTORY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! `crates/server/migrations/`

use user_directory_server::config::DirectoryConfig;
use user_directory_server::db;

use super::CommandError;

/// Run directory database migrations.
pub async fn run() -> Result<(), CommandError> {
    let config = DirectoryConfig::from_env()?;

    tracing::info!("Connecting to directory database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running directory migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Directory migrations complete!");
    Ok(())
}
