//! Invoice projection used by the CSV export.

use sqlx::SqlitePool;

use super::RepositoryError;

/// One exported invoice.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct InvoiceExportRow {
    pub invoice_no: Option<String>,
    pub date: Option<String>,
    pub customer: Option<String>,
    pub subtotal: Option<f64>,
    pub grand_total: Option<f64>,
}

/// Every invoice with its customer name, oldest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn invoice_rows(pool: &SqlitePool) -> Result<Vec<InvoiceExportRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, InvoiceExportRow>(
        "SELECT i.invoice_no, i.date, c.name AS customer, i.subtotal, i.grand_total
         FROM invoices i
         LEFT JOIN customers c ON i.customer_id = c.id
         ORDER BY i.id ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
