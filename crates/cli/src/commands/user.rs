//! User management commands.

use std::path::Path;

use secrecy::SecretString;

use ledgerdesk_core::{PermissionSet, UserRole};
use ledgerdesk_server::models::NewUser;
use ledgerdesk_server::services::AuthService;

use super::{CliError, open_store};

/// Create a user with a hashed password.
///
/// # Arguments
///
/// * `username` - Unique login name
/// * `password` - Plaintext password, hashed before storage
/// * `role` - `admin` or `operator`
/// * `permissions` - Capability tokens (`all` grants everything)
pub async fn create(
    database: &Path,
    username: &str,
    password: SecretString,
    role: &str,
    permissions: Vec<String>,
) -> Result<(), CliError> {
    let role: UserRole = role.parse()?;
    let store = open_store(database).await?;
    let pool = store.pool()?;

    let new_user = NewUser {
        username: username.to_owned(),
        password,
        role,
        permissions: permissions.into_iter().collect::<PermissionSet>(),
    };
    let id = AuthService::new(&pool).create_user(&new_user).await?;

    tracing::info!(user_id = %id, username, %role, "User created");
    pool.close().await;
    Ok(())
}

/// Replace an existing user's password.
pub async fn reset_password(
    database: &Path,
    username: &str,
    password: &SecretString,
) -> Result<(), CliError> {
    let store = open_store(database).await?;
    let pool = store.pool()?;

    AuthService::new(&pool)
        .reset_password(username, password)
        .await?;

    tracing::info!(username, "Password reset");
    pool.close().await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ledgerdesk_server::services::AuthError;

    #[tokio::test]
    async fn test_created_user_can_log_in() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");

        create(
            &path,
            "clerk",
            SecretString::from("pw1"),
            "operator",
            vec!["invoices".to_owned()],
        )
        .await
        .unwrap();

        let store = open_store(&path).await.unwrap();
        let user = AuthService::new(&store.pool().unwrap())
            .login("clerk", "pw1")
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Operator);
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected_before_touching_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");

        let err = create(&path, "clerk", SecretString::from("pw"), "owner", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidRole(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_reset_password_replaces_the_old_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");

        reset_password(&path, "admin", &SecretString::from("rotated"))
            .await
            .unwrap();

        let store = open_store(&path).await.unwrap();
        let pool = store.pool().unwrap();
        let auth = AuthService::new(&pool);
        assert!(auth.login("admin", "rotated").await.is_ok());
        assert!(matches!(
            auth.login("admin", "admin123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_reset_password_for_missing_user_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");

        let err = reset_password(&path, "ghost", &SecretString::from("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Auth(AuthError::UserNotFound)));
    }
}
