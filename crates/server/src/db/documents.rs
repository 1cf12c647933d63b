//! Invoice and quotation repository.
//!
//! Both document kinds share one code path; table and column names come from
//! [`DocumentKind`], never from request data.

use sqlx::SqlitePool;

use ledgerdesk_core::{CustomerId, DocumentId, DocumentKind, LineItemId};

use super::RepositoryError;
use crate::models::{DocumentDetail, DocumentHeader, LineItem, NewDocument};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct HeaderRow {
    id: DocumentId,
    number: Option<String>,
    customer_id: Option<CustomerId>,
    date: Option<String>,
    subtotal: Option<f64>,
    discount_percent: Option<f64>,
    discount_amount: Option<f64>,
    tax_percent: Option<f64>,
    service_charge: Option<f64>,
    grand_total: Option<f64>,
    customer_name: Option<String>,
}

impl HeaderRow {
    fn into_header(self, kind: DocumentKind) -> DocumentHeader {
        DocumentHeader {
            kind,
            id: self.id,
            number: self.number,
            customer_id: self.customer_id,
            date: self.date,
            subtotal: self.subtotal,
            discount_percent: self.discount_percent,
            discount_amount: self.discount_amount,
            tax_percent: self.tax_percent,
            service_charge: self.service_charge,
            grand_total: self.grand_total,
            customer_name: self.customer_name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DetailRow {
    #[sqlx(flatten)]
    header: HeaderRow,
    phone: Option<String>,
    address: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id: LineItemId,
    document_id: Option<DocumentId>,
    item_name: Option<String>,
    description: Option<String>,
    qty: Option<i64>,
    price: Option<f64>,
    total: Option<f64>,
}

impl LineItemRow {
    fn into_line_item(self, kind: DocumentKind) -> LineItem {
        LineItem {
            kind,
            id: self.id,
            document_id: self.document_id,
            item_name: self.item_name,
            description: self.description,
            qty: self.qty,
            price: self.price,
            total: self.total,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for one kind of document.
pub struct DocumentRepository<'a> {
    pool: &'a SqlitePool,
    kind: DocumentKind,
}

impl<'a> DocumentRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, kind: DocumentKind) -> Self {
        Self { pool, kind }
    }

    /// The kind of document this repository serves.
    #[must_use]
    pub const fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// List headers left-joined to the customer name, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_customer(&self) -> Result<Vec<DocumentHeader>, RepositoryError> {
        let sql = format!(
            "SELECT d.id, d.{number} AS number, d.customer_id, d.date, d.subtotal,
                    d.discount_percent, d.discount_amount, d.tax_percent,
                    d.service_charge, d.grand_total, c.name AS customer_name
             FROM {table} d
             LEFT JOIN customers c ON d.customer_id = c.id
             ORDER BY d.id DESC",
            number = self.kind.number_column(),
            table = self.kind.table(),
        );

        let rows: Vec<HeaderRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(|r| r.into_header(self.kind)).collect())
    }

    /// Fetch a header with customer contact details and its line items.
    ///
    /// Returns `None` without touching the line-item table when the header
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_line_items(
        &self,
        id: DocumentId,
    ) -> Result<Option<DocumentDetail>, RepositoryError> {
        let sql = format!(
            "SELECT d.id, d.{number} AS number, d.customer_id, d.date, d.subtotal,
                    d.discount_percent, d.discount_amount, d.tax_percent,
                    d.service_charge, d.grand_total,
                    c.name AS customer_name, c.phone, c.address
             FROM {table} d
             LEFT JOIN customers c ON d.customer_id = c.id
             WHERE d.id = ?",
            number = self.kind.number_column(),
            table = self.kind.table(),
        );

        let Some(row) = sqlx::query_as::<_, DetailRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
        else {
            return Ok(None);
        };

        let items = self.line_items(id).await?;

        Ok(Some(DocumentDetail {
            header: row.header.into_header(self.kind),
            phone: row.phone,
            address: row.address,
            items,
        }))
    }

    /// Line items belonging to `id`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn line_items(&self, id: DocumentId) -> Result<Vec<LineItem>, RepositoryError> {
        let sql = format!(
            "SELECT id, {parent} AS document_id, item_name, description, qty, price, total
             FROM {lines}
             WHERE {parent} = ?
             ORDER BY id ASC",
            parent = self.kind.parent_column(),
            lines = self.kind.line_table(),
        );

        let rows: Vec<LineItemRow> = sqlx::query_as(&sql).bind(id).fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(|r| r.into_line_item(self.kind)).collect())
    }

    /// Insert a header and its line items in one transaction.
    ///
    /// For invoices, every line that references a catalogue item draws that
    /// item's stock down by the line quantity. Stock is not clamped and may go
    /// negative. Nothing is written if any statement fails.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the document number is taken.
    /// Returns `RepositoryError::Database` if any other statement fails.
    pub async fn create(&self, doc: &NewDocument) -> Result<DocumentId, RepositoryError> {
        let header_sql = format!(
            "INSERT INTO {table} ({number}, customer_id, date, subtotal, discount_percent,
                                  discount_amount, tax_percent, service_charge, grand_total)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            table = self.kind.table(),
            number = self.kind.number_column(),
        );
        let line_sql = format!(
            "INSERT INTO {lines} ({parent}, item_name, description, qty, price, total)
             VALUES (?, ?, ?, ?, ?, ?)",
            lines = self.kind.line_table(),
            parent = self.kind.parent_column(),
        );

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(&header_sql)
            .bind(&doc.number)
            .bind(doc.customer_id)
            .bind(&doc.date)
            .bind(doc.subtotal)
            .bind(doc.discount_percent)
            .bind(doc.discount_amount)
            .bind(doc.tax_percent.unwrap_or(0.0))
            .bind(doc.service_charge.unwrap_or(0.0))
            .bind(doc.grand_total)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                RepositoryError::from_insert(e, &format!("{} number", self.kind.label()))
            })?;
        let id = DocumentId::new(result.last_insert_rowid());

        for line in &doc.items {
            sqlx::query(&line_sql)
                .bind(id)
                .bind(&line.name)
                .bind(&line.description)
                .bind(line.qty)
                .bind(line.price)
                .bind(line.total)
                .execute(&mut *tx)
                .await?;

            if self.kind.adjusts_stock()
                && let Some(item_id) = line.item_id
            {
                sqlx::query("UPDATE items SET stock = stock - ? WHERE id = ?")
                    .bind(line.qty.unwrap_or(0))
                    .bind(item_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(id)
    }

    /// Delete a document's line items, then its header, in one transaction.
    ///
    /// Deleting a missing id is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` for kinds that cannot be deleted.
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn delete(&self, id: DocumentId) -> Result<(), RepositoryError> {
        if !self.kind.is_deletable() {
            return Err(RepositoryError::Conflict(format!(
                "{} records cannot be deleted",
                self.kind.label()
            )));
        }

        let lines_sql = format!(
            "DELETE FROM {lines} WHERE {parent} = ?",
            lines = self.kind.line_table(),
            parent = self.kind.parent_column(),
        );
        let header_sql = format!("DELETE FROM {} WHERE id = ?", self.kind.table());

        let mut tx = self.pool.begin().await?;
        sqlx::query(&lines_sql).bind(id).execute(&mut *tx).await?;
        sqlx::query(&header_sql).bind(id).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Number of the most recently created document, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn last_number(&self) -> Result<Option<String>, RepositoryError> {
        let sql = format!(
            "SELECT {number} FROM {table} ORDER BY id DESC LIMIT 1",
            number = self.kind.number_column(),
            table = self.kind.table(),
        );

        let number: Option<Option<String>> =
            sqlx::query_scalar(&sql).fetch_optional(self.pool).await?;
        Ok(number.flatten())
    }
}
