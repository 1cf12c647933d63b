//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (store reachable)
//!
//! # Auth
//! POST /api/login              - Login, returns {success, role, username, permissions}
//! POST /api/logout             - Destroy session
//!
//! # Everything below requires a session
//! GET  /api/dashboard          - Summary counts and monthly sales
//!
//! GET  /api/items              - List items
//! POST /api/items              - Create item, returns {id}
//! POST /api/items/update       - Update item
//! POST /api/items/delete       - Delete item
//!
//! GET  /api/customers          - List customers
//! POST /api/customers          - Create customer, returns {id}
//! POST /api/customers/delete   - Delete customer
//!
//! GET  /api/invoice/last       - Newest invoice number
//! GET  /api/invoices           - List invoices
//! POST /api/invoices           - Create invoice (decrements stock)
//! GET  /api/invoices/{id}      - Invoice with line items, or null
//!
//! GET  /api/quotations         - List quotations
//! POST /api/quotations         - Create quotation
//! GET  /api/quotations/{id}    - Quotation with line items, or null
//! POST /api/quotations/delete  - Delete quotation and its line items
//!
//! GET  /api/settings           - Company settings, or {}
//! POST /api/settings           - Replace company settings
//!
//! GET  /api/users              - List users (no passwords)
//! POST /api/users              - Create user
//! POST /api/users/delete       - Delete user
//!
//! GET  /api/logs               - Latest 100 activity entries
//! GET  /api/backup             - Download the store file
//! POST /api/restore            - Replace the store (multipart field `dbfile`)
//! GET  /api/export             - Invoice CSV
//! ```

pub mod auth;
pub mod backup;
pub mod customers;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod items;
pub mod logs;
pub mod settings;
pub mod users;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db::{ActivityLog, RepositoryError};
use crate::error::AppError;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        // Dashboard
        .route("/dashboard", get(dashboard::summary))
        // Items
        .route("/items", get(items::index).post(items::create))
        .route("/items/update", post(items::update))
        .route("/items/delete", post(items::delete))
        // Customers
        .route("/customers", get(customers::index).post(customers::create))
        .route("/customers/delete", post(customers::delete))
        // Invoices
        .route("/invoice/last", get(documents::last_invoice))
        .route(
            "/invoices",
            get(documents::list_invoices).post(documents::create_invoice),
        )
        .route("/invoices/{id}", get(documents::show_invoice))
        // Quotations
        .route(
            "/quotations",
            get(documents::list_quotations).post(documents::create_quotation),
        )
        .route("/quotations/{id}", get(documents::show_quotation))
        .route("/quotations/delete", post(documents::delete_quotation))
        // Settings
        .route("/settings", get(settings::show).post(settings::update))
        // Users
        .route("/users", get(users::index).post(users::create))
        .route("/users/delete", post(users::delete))
        // Activity log
        .route("/logs", get(logs::index))
        // Backup / export
        .route("/backup", get(backup::download))
        .route("/restore", post(backup::restore))
        .route("/export", get(backup::export))
}

/// Body of every `.../delete` request.
///
/// The id may arrive as a number or a numeric string; empty or zero means
/// nothing was selected.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: From<i64>"))]
pub struct IdRequest<T> {
    #[serde(default, deserialize_with = "crate::models::lenient_id")]
    pub id: Option<T>,
}

/// Turn a write outcome into the boolean the front-end branches on.
///
/// A restore in progress is still an error (503). Constraint violations and
/// other failures are logged and reported as `false`.
pub(crate) fn flag(
    result: Result<(), RepositoryError>,
    operation: &'static str,
) -> Result<Json<bool>, AppError> {
    match result {
        Ok(()) => Ok(Json(true)),
        Err(RepositoryError::Unavailable) => Err(AppError::Unavailable),
        Err(RepositoryError::Conflict(reason)) => {
            tracing::info!(operation, %reason, "Write rejected");
            Ok(Json(false))
        }
        Err(e) => {
            tracing::error!(operation, error = %e, "Write failed");
            Ok(Json(false))
        }
    }
}

/// Append an audit entry for `user`. Failures are logged and swallowed.
pub(crate) async fn audit(pool: &SqlitePool, user: &CurrentUser, action: &str, details: &str) {
    if let Err(e) = ActivityLog::new(pool)
        .record(&user.username, action, details)
        .await
    {
        tracing::warn!(action, error = %e, "Failed to record activity");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_outcomes() {
        assert!(flag(Ok(()), "test").unwrap().0);
        assert!(!flag(Err(RepositoryError::Conflict("dup".into())), "test").unwrap().0);
        assert!(!flag(Err(RepositoryError::NotFound), "test").unwrap().0);
        assert!(matches!(
            flag(Err(RepositoryError::Unavailable), "test"),
            Err(AppError::Unavailable)
        ));
    }

    #[test]
    fn test_id_request_accepts_numbers_and_numeric_strings() {
        use ledgerdesk_core::ItemId;

        let parse = |body: &str| serde_json::from_str::<IdRequest<ItemId>>(body).unwrap().id;

        assert_eq!(parse(r#"{"id":5}"#), Some(ItemId::new(5)));
        assert_eq!(parse(r#"{"id":"5"}"#), Some(ItemId::new(5)));
        assert_eq!(parse(r#"{"id":""}"#), None);
        assert_eq!(parse(r#"{"id":0}"#), None);
        assert_eq!(parse("{}"), None);
        assert!(serde_json::from_str::<IdRequest<ItemId>>(r#"{"id":"abc"}"#).is_err());
    }
}
