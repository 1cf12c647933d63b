//! Store backup and restore.
//!
//! A restore stages the upload in the upload directory, checks that it is a
//! readable SQLite database, swaps it in through [`Store::replace_with`], and
//! brings the schema up to date. The staged file is always removed.

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use uuid::Uuid;

use crate::db::{RepositoryError, Store, schema};

/// The first 16 bytes of every SQLite database file.
pub const SQLITE_MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// Download name for backups.
pub const BACKUP_FILENAME: &str = "invoice_backup.db";

/// Errors that can occur during backup or restore.
#[derive(Debug, Error)]
pub enum BackupError {
    /// No file was uploaded.
    #[error("no backup file uploaded")]
    MissingUpload,

    /// The upload is not a usable SQLite database.
    #[error("uploaded file is not a valid database: {0}")]
    InvalidUpload(String),

    /// Filesystem error while staging the upload.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Backup and restore against one store.
pub struct BackupService<'a> {
    store: &'a Store,
    upload_dir: &'a Path,
}

impl<'a> BackupService<'a> {
    #[must_use]
    pub const fn new(store: &'a Store, upload_dir: &'a Path) -> Self {
        Self { store, upload_dir }
    }

    /// Raw bytes of the live store file.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::Repository` if the store is mid-restore or unreadable.
    pub async fn backup(&self) -> Result<Vec<u8>, BackupError> {
        Ok(self.store.snapshot().await?)
    }

    /// Replace the live store with an uploaded database.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::MissingUpload` if `upload` is `None`.
    /// Returns `BackupError::InvalidUpload` if the bytes are not a SQLite database.
    /// Returns `BackupError::Io` or `BackupError::Repository` if the swap fails.
    pub async fn restore(&self, upload: Option<&[u8]>) -> Result<(), BackupError> {
        let bytes = upload.ok_or(BackupError::MissingUpload)?;
        if !bytes.starts_with(SQLITE_MAGIC) {
            return Err(BackupError::InvalidUpload(
                "missing SQLite header".to_string(),
            ));
        }

        tokio::fs::create_dir_all(self.upload_dir).await?;
        let staged = self.staged_path();
        tokio::fs::write(&staged, bytes).await?;

        let result = self.swap_in(&staged).await;

        if let Err(e) = tokio::fs::remove_file(&staged).await {
            tracing::warn!(path = %staged.display(), error = %e, "Failed to remove staged upload");
        }

        result
    }

    async fn swap_in(&self, staged: &Path) -> Result<(), BackupError> {
        check_integrity(staged).await?;

        self.store.replace_with(staged).await?;

        let pool = self.store.pool()?;
        schema::ensure_schema(&pool).await?;

        tracing::info!(store = %self.store.path().display(), "Store restored from upload");
        Ok(())
    }

    fn staged_path(&self) -> PathBuf {
        self.upload_dir.join(format!("restore-{}.db", Uuid::new_v4()))
    }
}

/// Open `path` read-only and run SQLite's quick integrity check.
async fn check_integrity(path: &Path) -> Result<(), BackupError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true)
        .create_if_missing(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| BackupError::InvalidUpload(e.to_string()))?;

    let verdict: Result<String, sqlx::Error> = sqlx::query_scalar("PRAGMA quick_check")
        .fetch_one(&pool)
        .await;
    pool.close().await;

    match verdict {
        Ok(v) if v == "ok" => Ok(()),
        Ok(v) => Err(BackupError::InvalidUpload(v)),
        Err(e) => Err(BackupError::InvalidUpload(e.to_string())),
    }
}
