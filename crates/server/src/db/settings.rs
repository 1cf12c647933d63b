//! Company settings singleton.

use sqlx::SqlitePool;

use super::RepositoryError;
use crate::models::{CompanySettings, SettingsInput};

/// Repository for the company profile. At most one row exists.
pub struct SettingsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the settings row, if one has been saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self) -> Result<Option<CompanySettings>, RepositoryError> {
        let row = sqlx::query_as::<_, CompanySettings>(
            "SELECT id, name, address, phone, email, logo, prevent_negative
             FROM company_settings LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Replace the settings: delete every row, then insert one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either statement fails; the
    /// previous row is kept in that case.
    pub async fn replace(&self, input: &SettingsInput) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM company_settings")
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO company_settings (name, address, phone, email, logo, prevent_negative)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.logo)
        .bind(input.prevent_negative.unwrap_or(false))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
