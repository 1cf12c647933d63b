//! Dashboard summary payload.

use serde::Serialize;

/// Sales total for one `MM-YYYY` bucket.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct MonthlyTotal {
    pub month: Option<String>,
    pub total: f64,
}

/// Counts and sums shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub customers: i64,
    pub items: i64,
    pub invoices: i64,
    pub sales: f64,
    pub low_stock: i64,
    pub chart_data: Vec<MonthlyTotal>,
}
