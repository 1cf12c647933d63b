//! Customer routes. Customers have no update route.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use ledgerdesk_core::CustomerId;

use super::{IdRequest, flag};
use crate::db::CustomerRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Customer, NewCustomer};
use crate::state::AppState;

/// GET /api/customers
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<Customer>>> {
    let pool = state.pool()?;
    Ok(Json(CustomerRepository::new(&pool).list().await?))
}

/// POST /api/customers
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<NewCustomer>,
) -> Result<Json<Value>> {
    let pool = state.pool()?;
    let id = CustomerRepository::new(&pool).create(&input).await?;
    Ok(Json(json!({ "id": id })))
}

/// POST /api/customers/delete
///
/// Not recorded in the activity log.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(req): Json<IdRequest<CustomerId>>,
) -> Result<Json<bool>> {
    let Some(id) = req.id else {
        return Ok(Json(false));
    };
    let pool = state.pool()?;
    flag(
        CustomerRepository::new(&pool).delete(id).await,
        "delete customer",
    )
}
