//! Database operations for the single-file SQLite store.
//!
//! ## Tables
//!
//! - `users` - Login accounts (Argon2 password hashes, role, permissions)
//! - `company_settings` - Singleton company profile
//! - `customers` - Customer records
//! - `items` - Catalogue items with stock levels
//! - `invoices` / `invoice_items` - Invoice headers and line items
//! - `quotations` / `quotation_items` - Quotation headers and line items
//! - `logs` - Append-only activity trail
//!
//! # Schema
//!
//! The schema is created idempotently on startup by [`schema::ensure_schema`]
//! and can also be applied via:
//! ```bash
//! ldk-cli migrate
//! ```

pub mod customers;
pub mod dashboard;
pub mod documents;
pub mod export;
pub mod items;
pub mod logs;
pub mod schema;
pub mod settings;
pub mod users;

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;
use tokio::sync::RwLock;

pub use customers::CustomerRepository;
pub use documents::DocumentRepository;
pub use items::ItemRepository;
pub use logs::ActivityLog;
pub use settings::SettingsRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate document number).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The store is being replaced and cannot serve requests right now.
    #[error("store temporarily unavailable")]
    Unavailable,

    /// Filesystem error while touching the store file.
    #[error("store file error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            // A pool closed by a restore, or starved while one runs.
            sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => Self::Unavailable,
            other => Self::Database(other),
        }
    }
}

impl RepositoryError {
    /// Map a unique-constraint failure to `Conflict`, everything else through `From`.
    pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::from(err)
    }

    /// Whether the failure is transient (restore in progress).
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

/// Owning handle for the store file and its connection pool.
///
/// Handlers take a cheap pool clone per request through [`Store::pool`].
/// [`Store::replace_with`] swaps the underlying file under an exclusive lock;
/// callers arriving during the swap get [`RepositoryError::Unavailable`]
/// instead of waiting.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    pool: RwLock<SqlitePool>,
}

impl Store {
    /// Open (creating if missing) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the file cannot be opened.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let pool = create_pool(&path).await?;
        Ok(Self {
            path,
            pool: RwLock::new(pool),
        })
    }

    /// Path of the live store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a handle to the connection pool.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` while a restore holds the store.
    pub fn pool(&self) -> Result<SqlitePool, RepositoryError> {
        self.pool
            .try_read()
            .map(|pool| pool.clone())
            .map_err(|_| RepositoryError::Unavailable)
    }

    /// Read the raw bytes of the store file.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` during a restore, or
    /// `RepositoryError::Io` if the file cannot be read.
    pub async fn snapshot(&self) -> Result<Vec<u8>, RepositoryError> {
        let _guard = self
            .pool
            .try_read()
            .map_err(|_| RepositoryError::Unavailable)?;
        Ok(tokio::fs::read(&self.path).await?)
    }

    /// Replace the live store file with `source` and reopen the pool.
    ///
    /// The old pool is closed first so no connection keeps the previous file
    /// open while it is overwritten.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the copy fails or
    /// `RepositoryError::Database` if the new file cannot be opened.
    pub async fn replace_with(&self, source: &Path) -> Result<(), RepositoryError> {
        let mut pool = self.pool.write().await;

        pool.close().await;
        tracing::info!(store = %self.path.display(), "Store closed for replacement");

        let copied = tokio::fs::copy(source, &self.path).await;

        // Reopen whatever is on disk now, even if the copy failed part-way.
        *pool = create_pool(&self.path).await?;
        copied?;

        tracing::info!(store = %self.path.display(), "Store reopened");
        Ok(())
    }
}

/// Create a SQLite connection pool with sensible defaults.
///
/// Foreign keys stay off: deletes never cascade and orphan references are
/// tolerated, matching how the tables are used. The rollback journal keeps the
/// whole dataset in the single store file.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(false)
        .journal_mode(SqliteJournalMode::Delete)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use super::{SqlitePool, Store, schema};

    /// A migrated store inside a temporary directory.
    pub struct TestStore {
        pub dir: TempDir,
        pub store: Store,
    }

    impl TestStore {
        #[allow(clippy::unwrap_used)]
        pub async fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let store = Store::open(dir.path().join("test.db")).await.unwrap();
            schema::ensure_schema(&store.pool().unwrap()).await.unwrap();
            Self { dir, store }
        }

        #[allow(clippy::unwrap_used)]
        pub fn pool(&self) -> SqlitePool {
            self.store.pool().unwrap()
        }
    }
}
