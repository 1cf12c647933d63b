//! Ledgerdesk CLI - Store setup and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Create missing tables and seed the default admin
//! ldk-cli migrate
//!
//! # Create a user
//! ldk-cli user create -u clerk -p secret -r operator --permission all
//!
//! # Reset a forgotten password
//! ldk-cli user reset-password -u admin -p new-secret
//!
//! # Copy the store to a file
//! ldk-cli backup -o invoice_backup.db
//!
//! # Replace the store with a backup
//! ldk-cli restore -i invoice_backup.db
//!
//! # Write the invoice CSV
//! ldk-cli export -o invoices.csv
//! ```
//!
//! The store path comes from `LEDGERDESK_DATABASE_PATH` (or `.env`) unless
//! `--database` is given.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "ldk-cli")]
#[command(author, version, about = "Ledgerdesk CLI tools")]
struct Cli {
    /// SQLite store to operate on (overrides `LEDGERDESK_DATABASE_PATH`)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing tables and seed the default admin
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Write a byte copy of the store
    Backup {
        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Replace the store with a database file
    Restore {
        /// Backup file to load
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Write all invoices as CSV
    Export {
        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,

        /// User role (`admin`, `operator`)
        #[arg(short, long, default_value = "operator")]
        role: String,

        /// Capability to grant (repeatable; `all` for unrestricted)
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
    /// Replace a user's password
    ResetPassword {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // .env may carry RUST_LOG as well as the store path
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let database = commands::resolve_database(cli.database)?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&database).await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                password,
                role,
                permissions,
            } => {
                commands::user::create(
                    &database,
                    &username,
                    SecretString::from(password),
                    &role,
                    permissions,
                )
                .await?;
            }
            UserAction::ResetPassword { username, password } => {
                commands::user::reset_password(&database, &username, &SecretString::from(password))
                    .await?;
            }
        },
        Commands::Backup { output } => commands::backup::backup(&database, &output).await?,
        Commands::Restore { input } => commands::backup::restore(&database, &input).await?,
        Commands::Export { output } => commands::backup::export(&database, &output).await?,
    }
    Ok(())
}
