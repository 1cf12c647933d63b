//! Company settings routes.

use axum::{Json, extract::State};
use serde::Serialize;

use super::flag;
use crate::db::SettingsRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{CompanySettings, SettingsInput};
use crate::state::AppState;

/// The saved settings, or `{}` before anything has been saved.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SettingsResponse {
    Saved(CompanySettings),
    Empty {},
}

/// GET /api/settings
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<SettingsResponse>> {
    let pool = state.pool()?;
    let settings = SettingsRepository::new(&pool).get().await?;
    Ok(Json(settings.map_or(SettingsResponse::Empty {}, SettingsResponse::Saved)))
}

/// POST /api/settings
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<SettingsInput>,
) -> Result<Json<bool>> {
    let pool = state.pool()?;
    flag(
        SettingsRepository::new(&pool).replace(&input).await,
        "replace settings",
    )
}
