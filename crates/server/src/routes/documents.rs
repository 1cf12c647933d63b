//! Invoice and quotation routes.
//!
//! Each public handler pins a [`DocumentKind`] and delegates to a shared
//! helper. Invoices have no delete route.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use serde_json::{Value, json};
use tracing::instrument;

use ledgerdesk_core::{DocumentId, DocumentKind};

use super::{IdRequest, audit, flag};
use crate::db::DocumentRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, DocumentDetail, DocumentHeader, NewDocument};
use crate::state::AppState;

// =============================================================================
// Invoices
// =============================================================================

/// GET /api/invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<DocumentHeader>>> {
    list(&state, DocumentKind::Invoice).await
}

/// GET /api/invoices/{id}
///
/// `null` for an unknown or non-numeric id.
pub async fn show_invoice(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    id: std::result::Result<Path<DocumentId>, PathRejection>,
) -> Result<Json<Option<DocumentDetail>>> {
    show(&state, DocumentKind::Invoice, id).await
}

/// POST /api/invoices
#[instrument(skip_all, fields(invoice_no = %doc.number))]
pub async fn create_invoice(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(doc): Json<NewDocument>,
) -> Result<Json<bool>> {
    create(&state, &user, DocumentKind::Invoice, &doc).await
}

/// GET /api/invoice/last
///
/// `{"invoice_no": "..."}` for the newest invoice, `null` when there are none.
pub async fn last_invoice(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Option<Value>>> {
    let pool = state.pool()?;
    let number = DocumentRepository::new(&pool, DocumentKind::Invoice)
        .last_number()
        .await?;
    Ok(Json(number.map(|n| json!({ "invoice_no": n }))))
}

// =============================================================================
// Quotations
// =============================================================================

/// GET /api/quotations
pub async fn list_quotations(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<DocumentHeader>>> {
    list(&state, DocumentKind::Quotation).await
}

/// GET /api/quotations/{id}
///
/// `null` for an unknown or non-numeric id.
pub async fn show_quotation(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    id: std::result::Result<Path<DocumentId>, PathRejection>,
) -> Result<Json<Option<DocumentDetail>>> {
    show(&state, DocumentKind::Quotation, id).await
}

/// POST /api/quotations
#[instrument(skip_all, fields(quotation_no = %doc.number))]
pub async fn create_quotation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(doc): Json<NewDocument>,
) -> Result<Json<bool>> {
    create(&state, &user, DocumentKind::Quotation, &doc).await
}

/// POST /api/quotations/delete
#[instrument(skip_all, fields(quotation_id = ?req.id))]
pub async fn delete_quotation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<IdRequest<DocumentId>>,
) -> Result<Json<bool>> {
    let Some(id) = req.id else {
        return Ok(Json(false));
    };
    let pool = state.pool()?;
    let result = DocumentRepository::new(&pool, DocumentKind::Quotation)
        .delete(id)
        .await;
    if result.is_ok() {
        audit(&pool, &user, "Delete Quotation", &format!("ID: {id}")).await;
    }
    flag(result, "delete quotation")
}

// =============================================================================
// Shared
// =============================================================================

async fn list(state: &AppState, kind: DocumentKind) -> Result<Json<Vec<DocumentHeader>>> {
    let pool = state.pool()?;
    Ok(Json(
        DocumentRepository::new(&pool, kind)
            .list_with_customer()
            .await?,
    ))
}

async fn show(
    state: &AppState,
    kind: DocumentKind,
    id: std::result::Result<Path<DocumentId>, PathRejection>,
) -> Result<Json<Option<DocumentDetail>>> {
    let Ok(Path(id)) = id else {
        return Ok(Json(None));
    };
    let pool = state.pool()?;
    Ok(Json(
        DocumentRepository::new(&pool, kind)
            .get_with_line_items(id)
            .await?,
    ))
}

async fn create(
    state: &AppState,
    user: &CurrentUser,
    kind: DocumentKind,
    doc: &NewDocument,
) -> Result<Json<bool>> {
    let pool = state.pool()?;
    let result = DocumentRepository::new(&pool, kind).create(doc).await;

    if let Ok(id) = result {
        tracing::info!(document_id = %id, lines = doc.items.len(), "{kind} created");
        audit(
            &pool,
            user,
            &format!("Create {}", kind.label()),
            &format!("#{}", doc.number),
        )
        .await;
    }

    flag(result.map(|_| ()), "create document")
}
