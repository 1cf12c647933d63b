//! Login and logout.

use axum::{Json, extract::State};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use ledgerdesk_core::{PermissionSet, UserRole};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_session, set_current_user};
use crate::models::user::secret_string;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Login form. `user`/`pass` are accepted as aliases.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "user")]
    pub username: String,
    #[serde(alias = "pass", deserialize_with = "secret_string")]
    pub password: SecretString,
}

/// Login outcome. Wrong credentials are `{"success": false}` with status 200.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionSet>,
}

impl LoginResponse {
    const fn failed() -> Self {
        Self {
            success: false,
            role: None,
            username: None,
            permissions: None,
        }
    }
}

/// POST /api/login
#[instrument(skip(state, session, req), fields(username = %req.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let pool = state.pool()?;

    let user = match AuthService::new(&pool)
        .login(&req.username, req.password.expose_secret())
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Login rejected");
            return Ok(Json(LoginResponse::failed()));
        }
        Err(AuthError::Repository(e)) => return Err(e.into()),
        Err(e) => return Err(AppError::Internal(e.to_string())),
    };

    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, &user.username);
    tracing::info!(user_id = %user.id, "Login succeeded");

    Ok(Json(LoginResponse {
        success: true,
        role: Some(user.role),
        username: Some(user.username),
        permissions: Some(user.permissions),
    }))
}

/// POST /api/logout
///
/// Destroys the session whether or not anyone was logged in.
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>> {
    clear_session(&session).await?;
    clear_sentry_user();
    Ok(Json(serde_json::json!({ "success": true })))
}
