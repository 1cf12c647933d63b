//! Customer repository.

use sqlx::SqlitePool;

use ledgerdesk_core::CustomerId;

use super::RepositoryError;
use crate::models::{Customer, NewCustomer};

/// Repository for customer records.
pub struct CustomerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, email, address FROM customers ORDER BY id DESC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert a customer and return its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &NewCustomer) -> Result<CustomerId, RepositoryError> {
        let result =
            sqlx::query("INSERT INTO customers (name, phone, email, address) VALUES (?, ?, ?, ?)")
                .bind(&input.name)
                .bind(&input.phone)
                .bind(&input.email)
                .bind(&input.address)
                .execute(self.pool)
                .await?;

        Ok(CustomerId::new(result.last_insert_rowid()))
    }

    /// Delete a customer. Documents that reference it keep the dangling id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
