//! Store repository for database operations.

use sqlx::PgPool;

use campus_market_core::StoreId;

use super::RepositoryError;
use crate::models::Store;

/// Partial update of a store record. `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct StoreChanges {
    pub name: Option<String>,
    pub store_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List stores, optionally filtered by type.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store_type: Option<&str>) -> Result<Vec<Store>, RepositoryError> {
        let stores = sqlx::query_as::<_, Store>(
            "SELECT * FROM stores WHERE $1::text IS NULL OR store_type = $1 ORDER BY name",
        )
        .bind(store_type)
        .fetch_all(self.pool)
        .await?;
        Ok(stores)
    }

    /// Get a store by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(store)
    }

    /// Create a new store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        store_type: Option<&str>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Store, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            INSERT INTO stores (name, store_type, latitude, longitude)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(name)
        .bind(store_type)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(self.pool)
        .await?;
        Ok(store)
    }

    /// Apply a partial update to a store.
    ///
    /// Returns `None` if the store does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: StoreId,
        changes: StoreChanges,
    ) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            UPDATE stores SET
                name = COALESCE($2, name),
                store_type = COALESCE($3, store_type),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.store_type)
        .bind(changes.latitude)
        .bind(changes.longitude)
        .fetch_optional(self.pool)
        .await?;
        Ok(store)
    }

    /// Delete a store, returning the removed record.
    ///
    /// Returns `None` if the store does not exist. Favorites and product
    /// links referencing it are removed by `ON DELETE CASCADE`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>("DELETE FROM stores WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(store)
    }
}
