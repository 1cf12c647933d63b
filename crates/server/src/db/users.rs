//! User repository for database operations.
//!
//! Password material never leaves this module except through
//! [`StoredCredentials`], which only the auth service consumes.

use sqlx::SqlitePool;

use ledgerdesk_core::{PermissionSet, UserId, UserRole};

use super::RepositoryError;
use crate::models::User;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: Option<String>,
    role: Option<String>,
    permissions: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let role = parse_role(row.id, row.role.as_deref());
        Self {
            id: row.id,
            username: row.username.unwrap_or_default(),
            role,
            permissions: PermissionSet::from_stored(row.permissions.as_deref()),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: UserId,
    username: Option<String>,
    password: Option<String>,
    role: Option<String>,
    permissions: Option<String>,
}

/// A user together with the stored password value (hash or legacy text).
#[derive(Debug)]
pub struct StoredCredentials {
    pub user: User,
    pub password: String,
}

impl From<CredentialRow> for StoredCredentials {
    fn from(row: CredentialRow) -> Self {
        let password = row.password.unwrap_or_default();
        let user = User::from(UserRow {
            id: row.id,
            username: row.username,
            role: row.role,
            permissions: row.permissions,
        });
        Self { user, password }
    }
}

/// Decode the stored role. Missing means the column default; a value this
/// system never writes (older stores kept free text) reads as `Operator`.
fn parse_role(id: UserId, raw: Option<&str>) -> UserRole {
    match raw {
        None | Some("") => UserRole::default(),
        Some(text) => text.parse().unwrap_or_else(|e| {
            tracing::warn!(user_id = %id, error = %e, "Unknown stored role, treating as operator");
            UserRole::Operator
        }),
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user accounts.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<UserRow> =
            sqlx::query_as("SELECT id, username, role, permissions FROM users ORDER BY id ASC")
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Insert a user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    /// Returns `RepositoryError::Database` if the insert fails otherwise.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: UserRole,
        permissions: &PermissionSet,
    ) -> Result<UserId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (username, password, role, permissions) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(permissions.to_stored())
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "username"))?;

        Ok(UserId::new(result.last_insert_rowid()))
    }

    /// Delete a user. Deleting a missing id is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Look up a user and their stored password by exact username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, RepositoryError> {
        let row: Option<CredentialRow> = sqlx::query_as(
            "SELECT id, username, password, role, permissions FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(StoredCredentials::from))
    }

    /// Overwrite a user's stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such user exists.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support::TestStore;

    #[tokio::test]
    async fn test_list_omits_password_and_parses_permissions() {
        let ts = TestStore::new().await;
        let pool = ts.pool();
        let repo = UserRepository::new(&pool);

        let users = repo.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "admin");
        assert_eq!(users[0].role, UserRole::Admin);
        assert!(users[0].permissions.is_unrestricted());

        let json = serde_json::to_value(&users[0]).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["permissions"], serde_json::json!(["all"]));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let ts = TestStore::new().await;
        let pool = ts.pool();
        let repo = UserRepository::new(&pool);

        repo.create("clerk", "hash", UserRole::Operator, &PermissionSet::default())
            .await
            .unwrap();
        let err = repo
            .create("clerk", "hash", UserRole::Operator, &PermissionSet::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_ok() {
        let ts = TestStore::new().await;
        let pool = ts.pool();
        UserRepository::new(&pool)
            .delete(UserId::new(999))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_malformed_permissions_read_as_empty() {
        let ts = TestStore::new().await;
        let pool = ts.pool();
        sqlx::query("INSERT INTO users (username, password, permissions) VALUES ('x', 'pw', 'nope')")
            .execute(&pool)
            .await
            .unwrap();

        let creds = UserRepository::new(&pool)
            .find_credentials("x")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.password, "pw");
        assert_eq!(creds.user.role, UserRole::Operator);
        assert!(creds.user.permissions.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_role_reads_as_operator() {
        let ts = TestStore::new().await;
        let pool = ts.pool();
        sqlx::query("INSERT INTO users (username, password, role) VALUES ('old', 'pw', 'manager')")
            .execute(&pool)
            .await
            .unwrap();
        let repo = UserRepository::new(&pool);

        let users = repo.list().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].role, UserRole::Admin);
        assert_eq!(users[1].username, "old");
        assert_eq!(users[1].role, UserRole::Operator);

        let creds = repo.find_credentials("old").await.unwrap().unwrap();
        assert_eq!(creds.user.role, UserRole::Operator);
    }

    #[tokio::test]
    async fn test_update_password_missing_user() {
        let ts = TestStore::new().await;
        let pool = ts.pool();
        let err = UserRepository::new(&pool)
            .update_password(UserId::new(42), "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
