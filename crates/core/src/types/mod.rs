//! Core types for Ledgerdesk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod document;
pub mod id;
pub mod permission;
pub mod role;

pub use document::DocumentKind;
pub use id::*;
pub use permission::{PermissionSet, WILDCARD_PERMISSION};
pub use role::{UserRole, UserRoleError};
