//! Session-related types for authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use ledgerdesk_core::{PermissionSet, UserId, UserRole};

/// Session-stored principal.
///
/// Captured from the user row at login time; later changes to the row are not
/// reflected until the next login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Login name, recorded as the actor in audit entries.
    pub username: String,
    /// Role at login time.
    pub role: UserRole,
    /// Capabilities at login time.
    pub permissions: PermissionSet,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
