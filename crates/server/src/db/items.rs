//! Catalogue item repository.

use sqlx::SqlitePool;

use ledgerdesk_core::ItemId;

use super::RepositoryError;
use crate::models::{Item, ItemInput};

/// Repository for catalogue items.
pub struct ItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query_as::<_, Item>(
            "SELECT id, name, description, unit, price, stock FROM items ORDER BY id DESC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Fetch one item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, Item>(
            "SELECT id, name, description, unit, price, stock FROM items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Insert an item and return its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ItemInput) -> Result<ItemId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO items (name, description, unit, price, stock) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.unit)
        .bind(input.price)
        .bind(input.stock)
        .execute(self.pool)
        .await?;

        Ok(ItemId::new(result.last_insert_rowid()))
    }

    /// Overwrite every editable field of an item.
    ///
    /// Updating a missing id affects nothing and is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(&self, id: ItemId, input: &ItemInput) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE items SET name = ?, description = ?, unit = ?, price = ?, stock = ? WHERE id = ?",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.unit)
        .bind(input.price)
        .bind(input.stock)
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Delete an item. Line items copied from it are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ItemId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support::TestStore;

    fn widget() -> ItemInput {
        ItemInput {
            name: Some("Widget".to_string()),
            description: Some("Blue".to_string()),
            unit: Some("pc".to_string()),
            price: Some(5.0),
            stock: Some(20),
        }
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let ts = TestStore::new().await;
        let pool = ts.pool();
        let repo = ItemRepository::new(&pool);

        let id = repo.create(&widget()).await.unwrap();
        let mut changed = widget();
        changed.stock = Some(3);
        changed.description = None;
        repo.update(id, &changed).await.unwrap();

        let item = repo.get(id).await.unwrap().unwrap();
        assert_eq!(item.stock, Some(3));
        assert_eq!(item.description, None);
        assert_eq!(item.price, Some(5.0));
    }

    #[tokio::test]
    async fn test_list_newest_first_and_delete() {
        let ts = TestStore::new().await;
        let pool = ts.pool();
        let repo = ItemRepository::new(&pool);

        let a = repo.create(&widget()).await.unwrap();
        let b = repo.create(&widget()).await.unwrap();
        let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![b, a]);

        repo.delete(a).await.unwrap();
        assert!(repo.get(a).await.unwrap().is_none());
        repo.delete(ItemId::new(999)).await.unwrap();
    }
}
