//! Catalogue item routes.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

use ledgerdesk_core::ItemId;

use super::{IdRequest, audit, flag};
use crate::db::ItemRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Item, ItemInput, ItemUpdate};
use crate::state::AppState;

/// GET /api/items
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<Item>>> {
    let pool = state.pool()?;
    Ok(Json(ItemRepository::new(&pool).list().await?))
}

/// POST /api/items
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<ItemInput>,
) -> Result<Json<Value>> {
    let pool = state.pool()?;
    let id = ItemRepository::new(&pool).create(&input).await?;
    Ok(Json(json!({ "id": id })))
}

/// POST /api/items/update
#[instrument(skip_all, fields(item_id = %req.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(req): Json<ItemUpdate>,
) -> Result<Json<bool>> {
    let pool = state.pool()?;
    flag(
        ItemRepository::new(&pool).update(req.id, &req.fields).await,
        "update item",
    )
}

/// POST /api/items/delete
#[instrument(skip_all, fields(item_id = ?req.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<IdRequest<ItemId>>,
) -> Result<Json<bool>> {
    let Some(id) = req.id else {
        return Ok(Json(false));
    };
    let pool = state.pool()?;
    let result = ItemRepository::new(&pool).delete(id).await;
    if result.is_ok() {
        audit(&pool, &user, "Delete Item", &format!("ID: {id}")).await;
    }
    flag(result, "delete item")
}
