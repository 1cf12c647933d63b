//! Authentication service.
//!
//! Password login against Argon2id hashes. Stores restored from older
//! installations may still hold plaintext passwords; those are compared in
//! constant time and rewritten as hashes on the first successful login.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use subtle::ConstantTimeEq;

use ledgerdesk_core::UserId;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::{CurrentUser, NewUser};

/// How a stored password matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasswordMatch {
    Hashed,
    Legacy,
}

/// Authentication service.
///
/// Handles login and the account operations that need password hashing.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Login with username and password.
    ///
    /// Returns the principal to attach to the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let creds = self
            .users
            .find_credentials(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let matched = verify_password(password, &creds.password)?;

        if matched == PasswordMatch::Legacy {
            self.upgrade_legacy_password(creds.user.id, password).await;
        }

        let user = creds.user;
        Ok(CurrentUser {
            id: user.id,
            username: user.username,
            role: user.role,
            permissions: user.permissions,
        })
    }

    /// Create a user, hashing the supplied password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub async fn create_user(&self, new_user: &NewUser) -> Result<UserId, AuthError> {
        let password_hash = hash_password(new_user.password.expose_secret())?;

        self.users
            .create(
                &new_user.username,
                &password_hash,
                new_user.role,
                &new_user.permissions,
            )
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Replace a user's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no user has that username.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub async fn reset_password(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<(), AuthError> {
        let creds = self
            .users
            .find_credentials(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let password_hash = hash_password(password.expose_secret())?;
        self.users
            .update_password(creds.user.id, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }

    /// Rewrite a plaintext password as a hash. Failure keeps the old value.
    async fn upgrade_legacy_password(&self, id: UserId, password: &str) {
        let result = match hash_password(password) {
            Ok(hash) => self.users.update_password(id, &hash).await.map_err(AuthError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => tracing::info!(user_id = %id, "Upgraded legacy password to Argon2"),
            Err(e) => tracing::warn!(user_id = %id, error = %e, "Failed to upgrade legacy password"),
        }
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against the stored value.
///
/// PHC strings are verified with Argon2. Anything else is a legacy plaintext
/// password and is compared in constant time. An empty stored value never
/// matches.
fn verify_password(password: &str, stored: &str) -> Result<PasswordMatch, AuthError> {
    if stored.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }

    if let Ok(parsed_hash) = PasswordHash::new(stored) {
        return Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map(|()| PasswordMatch::Hashed)
            .map_err(|_| AuthError::InvalidCredentials);
    }

    if bool::from(password.as_bytes().ct_eq(stored.as_bytes())) {
        Ok(PasswordMatch::Legacy)
    } else {
        Err(AuthError::InvalidCredentials)
    }
}
