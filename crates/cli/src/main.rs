//! User directory CLI - Database migrations and account tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ud-cli migrate
//!
//! # Create an account
//! ud-cli user create -e alice@example.com -u alice -p 's3cret'
//!
//! # Show an account
//! ud-cli user show --id 42
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create a customer account
//! - `user show` - Print an account as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use user_directory_core::UserId;

mod commands;

#[derive(Parser)]
#[command(name = "ud-cli")]
#[command(author, version, about = "User directory CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new customer account
    Create {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Public username
        #[arg(short = 'u', long)]
        user_name: String,

        /// Initial password
        #[arg(short, long)]
        password: String,
    },
    /// Print an account as JSON
    Show {
        /// Account ID
        #[arg(long)]
        id: UserId,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                user_name,
                password,
            } => commands::user::create(&email, &user_name, &password).await?,
            UserAction::Show { id } => commands::user::show(id).await?,
        },
    }
    Ok(())
}
