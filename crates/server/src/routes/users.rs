//! User management routes.
//!
//! Users can be listed, created, and deleted. There is no update route.

use axum::{Json, extract::State};
use tracing::instrument;

use ledgerdesk_core::UserId;

use super::{IdRequest, audit, flag};
use crate::db::{RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{NewUser, User};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// GET /api/users
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<User>>> {
    let pool = state.pool()?;
    Ok(Json(UserRepository::new(&pool).list().await?))
}

/// POST /api/users
///
/// `false` when the username is already taken.
#[instrument(skip_all, fields(username = %new_user.username, role = %new_user.role))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(new_user): Json<NewUser>,
) -> Result<Json<bool>> {
    let pool = state.pool()?;

    match AuthService::new(&pool).create_user(&new_user).await {
        Ok(id) => {
            tracing::info!(user_id = %id, "User created");
            Ok(Json(true))
        }
        Err(AuthError::UserAlreadyExists) => Ok(Json(false)),
        Err(AuthError::Repository(RepositoryError::Unavailable)) => Err(AppError::Unavailable),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create user");
            Ok(Json(false))
        }
    }
}

/// POST /api/users/delete
#[instrument(skip_all, fields(user_id = ?req.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<IdRequest<UserId>>,
) -> Result<Json<bool>> {
    let Some(id) = req.id else {
        return Ok(Json(false));
    };
    let pool = state.pool()?;
    let result = UserRepository::new(&pool).delete(id).await;
    if result.is_ok() {
        audit(&pool, &user, "Delete User", &format!("ID: {id}")).await;
    }
    flag(result, "delete user")
}
