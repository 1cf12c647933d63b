//! Dashboard route.

use axum::{Json, extract::State};

use crate::db::dashboard;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::DashboardSummary;
use crate::state::AppState;

/// GET /api/dashboard
///
/// Individual figures that fail to load are reported as zero.
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<DashboardSummary>> {
    let pool = state.pool()?;
    Ok(Json(dashboard::summary(&pool).await))
}
