//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password login (Argon2id, legacy plaintext upgrade) and account hashing
//! - `backup` - Store download and validated restore
//! - `export` - Invoice CSV export

pub mod auth;
pub mod backup;
pub mod export;

pub use auth::{AuthError, AuthService, hash_password};
pub use backup::{BackupError, BackupService};
