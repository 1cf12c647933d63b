//! Idempotent schema setup and first-run seeding.

use sqlx::SqlitePool;

use ledgerdesk_core::{PermissionSet, UserRole};

use super::RepositoryError;
use crate::services::auth::hash_password;

/// Username of the account seeded on first boot.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Password of the account seeded on first boot.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Table definitions, referenced tables before the tables that reference them.
const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE,
        password TEXT,
        role TEXT DEFAULT 'operator',
        permissions TEXT DEFAULT '[]'
    )",
    "CREATE TABLE IF NOT EXISTS company_settings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        address TEXT,
        phone TEXT,
        email TEXT,
        logo TEXT,
        prevent_negative INTEGER DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        phone TEXT,
        email TEXT,
        address TEXT
    )",
    "CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        description TEXT,
        unit TEXT,
        price REAL,
        stock INTEGER
    )",
    "CREATE TABLE IF NOT EXISTS invoices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        invoice_no TEXT UNIQUE,
        customer_id INTEGER,
        date TEXT,
        subtotal REAL,
        discount_percent REAL,
        discount_amount REAL,
        tax_percent REAL DEFAULT 0,
        service_charge REAL DEFAULT 0,
        grand_total REAL,
        FOREIGN KEY(customer_id) REFERENCES customers(id)
    )",
    "CREATE TABLE IF NOT EXISTS invoice_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        invoice_id INTEGER,
        item_name TEXT,
        description TEXT,
        qty INTEGER,
        price REAL,
        total REAL,
        FOREIGN KEY(invoice_id) REFERENCES invoices(id)
    )",
    "CREATE TABLE IF NOT EXISTS logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT,
        action TEXT,
        details TEXT,
        timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS quotations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        quotation_no TEXT UNIQUE,
        customer_id INTEGER,
        date TEXT,
        subtotal REAL,
        discount_percent REAL,
        discount_amount REAL,
        tax_percent REAL DEFAULT 0,
        service_charge REAL DEFAULT 0,
        grand_total REAL,
        FOREIGN KEY(customer_id) REFERENCES customers(id)
    )",
    "CREATE TABLE IF NOT EXISTS quotation_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        quotation_id INTEGER,
        item_name TEXT,
        description TEXT,
        qty INTEGER,
        price REAL,
        total REAL,
        FOREIGN KEY(quotation_id) REFERENCES quotations(id)
    )",
];

/// Create any missing tables and seed the default administrator.
///
/// Safe to call on every startup: existing tables are left untouched and the
/// administrator is only inserted when no `admin` row exists. The check and
/// insert are not atomic against a second process booting at the same time.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a statement fails, or
/// `RepositoryError::DataCorruption` if the default password cannot be hashed.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepositoryError> {
    for ddl in TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }

    seed_admin(pool).await
}

async fn seed_admin(pool: &SqlitePool) -> Result<(), RepositoryError> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(DEFAULT_ADMIN_USERNAME)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(DEFAULT_ADMIN_PASSWORD)
        .map_err(|e| RepositoryError::DataCorruption(format!("cannot hash seed password: {e}")))?;

    sqlx::query("INSERT INTO users (username, password, role, permissions) VALUES (?, ?, ?, ?)")
        .bind(DEFAULT_ADMIN_USERNAME)
        .bind(password_hash)
        .bind(UserRole::Admin.as_str())
        .bind(PermissionSet::wildcard().to_stored())
        .execute(pool)
        .await?;

    tracing::info!(username = DEFAULT_ADMIN_USERNAME, "Seeded default administrator");
    Ok(())
}
