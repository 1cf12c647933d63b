//! Backup, restore, and CSV export routes.

use axum::{
    Json,
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::backup::BACKUP_FILENAME;
use crate::services::export::{EXPORT_FILENAME, export_invoices};
use crate::services::{BackupError, BackupService};
use crate::state::AppState;

/// Multipart field carrying the uploaded database.
pub const RESTORE_FIELD: &str = "dbfile";

/// GET /api/backup
pub async fn download(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Response> {
    let service = BackupService::new(state.store(), &state.config().upload_dir);
    let bytes = service.backup().await.map_err(|e| match e {
        BackupError::Repository(e) => AppError::from(e),
        other => AppError::Internal(other.to_string()),
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{BACKUP_FILENAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// POST /api/restore
///
/// `false` when no `dbfile` part was sent or it is not a usable database.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn restore(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Result<Json<bool>> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some(RESTORE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            upload = Some(bytes);
            break;
        }
    }

    let service = BackupService::new(state.store(), &state.config().upload_dir);
    match service.restore(upload.as_deref()).await {
        Ok(()) => Ok(Json(true)),
        Err(e @ (BackupError::MissingUpload | BackupError::InvalidUpload(_))) => {
            tracing::warn!(error = %e, "Restore rejected");
            Ok(Json(false))
        }
        Err(BackupError::Repository(RepositoryError::Unavailable)) => Err(AppError::Unavailable),
        Err(e) => {
            tracing::error!(error = %e, "Restore failed");
            sentry::capture_error(&e);
            Ok(Json(false))
        }
    }
}

/// GET /api/export
pub async fn export(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Response> {
    let pool = state.pool()?;
    let csv = export_invoices(&pool).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
