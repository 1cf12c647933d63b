//! Catalogue items.

use serde::{Deserialize, Serialize};

use ledgerdesk_core::ItemId;

/// An item row. Stock may be negative; invoicing never clamps it.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Item {
    pub id: ItemId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

/// Editable item fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemInput {
    pub name: Option<String>,
    #[serde(rename = "desc", alias = "description")]
    pub description: Option<String>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

/// Request body for updating an item.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemUpdate {
    pub id: ItemId,
    #[serde(flatten)]
    pub fields: ItemInput,
}
