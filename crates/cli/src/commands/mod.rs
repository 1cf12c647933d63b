//! Subcommand implementations.

pub mod backup;
pub mod migrate;
pub mod user;

use std::path::{Path, PathBuf};

use thiserror::Error;

use ledgerdesk_core::UserRoleError;
use ledgerdesk_server::config::{ConfigError, ServerConfig};
use ledgerdesk_server::db::{RepositoryError, Store, schema};
use ledgerdesk_server::services::{AuthError, BackupError};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Restore failed: {0}")]
    Backup(#[from] BackupError),

    #[error(transparent)]
    InvalidRole(#[from] UserRoleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The store path: the explicit flag, else the configured one.
pub fn resolve_database(flag: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match flag {
        Some(path) => Ok(path),
        None => Ok(ServerConfig::from_env()?.database_path),
    }
}

/// Open the store and make sure every table exists.
pub async fn open_store(path: &Path) -> Result<Store, CliError> {
    tracing::info!(store = %path.display(), "Opening store");
    let store = Store::open(path).await?;
    schema::ensure_schema(&store.pool()?).await?;
    Ok(store)
}
