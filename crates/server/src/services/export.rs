//! CSV export of invoices.

use std::fmt::Write as _;

use sqlx::SqlitePool;

use crate::db::RepositoryError;
use crate::db::export::{InvoiceExportRow, invoice_rows};

/// First line of every export.
pub const CSV_HEADER: &str = "InvoiceNo,Date,Customer,Subtotal,GrandTotal";

/// Download name for the export.
pub const EXPORT_FILENAME: &str = "invoices.csv";

/// Build the CSV text for every invoice in the store.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn export_invoices(pool: &SqlitePool) -> Result<String, RepositoryError> {
    let rows = invoice_rows(pool).await?;
    Ok(render_csv(&rows))
}

/// Render rows as CSV. Every data field is quoted; missing values are empty.
#[must_use]
pub fn render_csv(rows: &[InvoiceExportRow]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + rows.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for row in rows {
        let fields = [
            row.invoice_no.clone().unwrap_or_default(),
            row.date.clone().unwrap_or_default(),
            row.customer.clone().unwrap_or_default(),
            row.subtotal.map(|v| v.to_string()).unwrap_or_default(),
            row.grand_total.map(|v| v.to_string()).unwrap_or_default(),
        ];

        let line = fields
            .iter()
            .map(|f| quote(f))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(out, "{line}");
    }

    out
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(no: &str, customer: Option<&str>) -> InvoiceExportRow {
        InvoiceExportRow {
            invoice_no: Some(no.to_string()),
            date: Some("2024-05-01".to_string()),
            customer: customer.map(str::to_string),
            subtotal: Some(20.0),
            grand_total: Some(21.5),
        }
    }

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(render_csv(&[]), "InvoiceNo,Date,Customer,Subtotal,GrandTotal\n");
    }

    #[test]
    fn test_fields_are_quoted() {
        let csv = render_csv(&[row("INV-1", Some("Acme")), row("INV-2", None)]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[1], r#""INV-1","2024-05-01","Acme","20","21.5""#);
        assert_eq!(lines[2], r#""INV-2","2024-05-01","","20","21.5""#);
    }

    #[test]
    fn test_commas_quotes_and_newlines_are_escaped() {
        let csv = render_csv(&[row("INV-3", Some("Smith, \"Jo\"\nLtd"))]);
        assert!(csv.contains(r#""Smith, ""Jo""
Ltd""#));
    }
}
