//! Ledgerdesk Core - Shared types library.
//!
//! This crate provides common types used across all Ledgerdesk components:
//! - `server` - JSON backend (records, documents, dashboard, backup)
//! - `cli` - Command-line tools for schema setup, users and exports
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, user roles, permission sets and document kinds

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
