//! Customer records.

use serde::{Deserialize, Serialize};

use ledgerdesk_core::CustomerId;

/// A customer row.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Request body for creating a customer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCustomer {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}
