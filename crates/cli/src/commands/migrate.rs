//! Schema setup command.

use std::path::Path;

use ledgerdesk_server::db::RepositoryError;

use super::{CliError, open_store};

/// Create missing tables and seed the default admin on an empty store.
pub async fn run(database: &Path) -> Result<(), CliError> {
    let store = open_store(database).await?;
    let pool = store.pool()?;

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .map_err(RepositoryError::from)?;

    tracing::info!(users, "Schema is up to date");
    pool.close().await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_creates_store_with_default_admin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.db");

        run(&path).await.unwrap();
        // Running twice is harmless
        run(&path).await.unwrap();

        let store = ledgerdesk_server::db::Store::open(&path).await.unwrap();
        let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'admin'")
            .fetch_one(&store.pool().unwrap())
            .await
            .unwrap();
        assert_eq!(admins, 1);
    }
}
