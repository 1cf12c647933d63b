//! Append-only activity trail.

use sqlx::SqlitePool;

use super::RepositoryError;
use crate::models::LogEntry;

/// Maximum number of entries returned by [`ActivityLog::recent`].
pub const RECENT_LIMIT: i64 = 100;

/// Writer and reader for the `logs` table.
pub struct ActivityLog<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ActivityLog<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append an entry. The timestamp is filled in by the database.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(
        &self,
        username: &str,
        action: &str,
        details: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO logs (username, action, details) VALUES (?, ?, ?)")
            .bind(username)
            .bind(action)
            .bind(details)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// The newest [`RECENT_LIMIT`] entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent(&self) -> Result<Vec<LogEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, LogEntry>(
            "SELECT id, username, action, details, timestamp FROM logs ORDER BY id DESC LIMIT ?",
        )
        .bind(RECENT_LIMIT)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
