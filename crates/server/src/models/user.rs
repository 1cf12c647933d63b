//! User account types.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

use ledgerdesk_core::{PermissionSet, UserId, UserRole};

/// A user account as exposed to clients (never carries password material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: UserRole,
    pub permissions: PermissionSet,
}

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    #[serde(deserialize_with = "secret_string")]
    pub password: SecretString,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub permissions: PermissionSet,
}

/// Deserialize a plain JSON string straight into a `SecretString`.
pub(crate) fn secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}
