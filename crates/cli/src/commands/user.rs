//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (hashed exactly as the HTTP API does)
//! ud-cli user create -e alice@example.com -u alice -p 's3cret'
//!
//! # Print an account as JSON
//! ud-cli user show --id 42
//! ```

use user_directory_core::UserId;
use user_directory_server::claims::NoClaims;
use user_directory_server::config::DirectoryConfig;
use user_directory_server::db::{self, UserRepository};
use user_directory_server::models::UserView;
use user_directory_server::services::IdentityService;

use super::CommandError;

async fn connect() -> Result<IdentityService<UserRepository, NoClaims>, CommandError> {
    let config = DirectoryConfig::from_env()?;

    tracing::info!("Connecting to directory database...");
    let pool = db::create_pool(&config.database_url).await?;

    Ok(IdentityService::new(UserRepository::new(pool), NoClaims))
}

/// Create a new customer account.
pub async fn create(email: &str, user_name: &str, password: &str) -> Result<(), CommandError> {
    let identity = connect().await?;
    let message = identity.create_account(email, user_name, password).await?;

    tracing::info!("{message}");
    Ok(())
}

/// Print an account's full view.
pub async fn show(id: UserId) -> Result<(), CommandError> {
    let identity = connect().await?;
    let user = identity.get_by_id(id).await?;
    let json = serde_json::to_string_pretty(&UserView::full(&user))?;

    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}
