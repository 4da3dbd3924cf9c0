//! Yarnhaven CLI - Backend seeding and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the hosted backend with demo products
//! yh-cli seed
//!
//! # Grant admin rights to an account
//! yh-cli admin grant -e admin@example.com
//!
//! # Check backend connectivity
//! yh-cli ping
//! ```
//!
//! # Environment
//!
//! All commands read `SUPABASE_URL`, `SUPABASE_ANON_KEY`, and
//! `SUPABASE_SERVICE_ROLE_KEY` (via the environment or a `.env` file).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "yh-cli")]
#[command(author, version, about = "Yarnhaven CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the hosted backend with demo products
    Seed,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Check hosted backend connectivity
    Ping,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant admin rights to an existing account
    Grant {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Revoke admin rights from an account
    Revoke {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), commands::CliError> {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yh_cli=info,yarnhaven_admin=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed => commands::seed::run().await,
        Commands::Admin { action } => match action {
            AdminAction::Grant { email } => commands::admin::grant(&email, true).await,
            AdminAction::Revoke { email } => commands::admin::grant(&email, false).await,
        },
        Commands::Ping => commands::ping::run().await,
    }
}
