//! Activity log route.

use axum::{Json, extract::State};

use crate::db::ActivityLog;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::LogEntry;
use crate::state::AppState;

/// GET /api/logs
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<LogEntry>>> {
    let pool = state.pool()?;
    Ok(Json(ActivityLog::new(&pool).recent().await?))
}
