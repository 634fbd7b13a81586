//! Favorite-store repository for database operations.

use sqlx::PgPool;

use campus_market_core::{FavoriteStoreId, StoreId, UserId};

use super::{RepositoryError, map_constraint_violation};
use crate::models::{FavoriteStore, FavoriteStoreWithStore, Store};

/// Row for a favorite with the store record resolved.
#[derive(Debug, sqlx::FromRow)]
struct FavoriteWithStoreRow {
    favorite_id: FavoriteStoreId,
    #[sqlx(flatten)]
    store: Store,
}

/// Repository for favorite-store database operations.
pub struct FavoriteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FavoriteRepository<'a> {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a favorite by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: FavoriteStoreId) -> Result<Option<FavoriteStore>, RepositoryError> {
        let favorite =
            sqlx::query_as::<_, FavoriteStore>("SELECT * FROM favorite_stores WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(favorite)
    }

    /// List every favorite (administrator view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<FavoriteStore>, RepositoryError> {
        let favorites =
            sqlx::query_as::<_, FavoriteStore>("SELECT * FROM favorite_stores ORDER BY created_at")
                .fetch_all(self.pool)
                .await?;
        Ok(favorites)
    }

    /// List one user's favorites.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<FavoriteStore>, RepositoryError> {
        let favorites = sqlx::query_as::<_, FavoriteStore>(
            "SELECT * FROM favorite_stores WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(favorites)
    }

    /// List one user's favorites with the store records resolved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_stores(
        &self,
        user_id: UserId,
    ) -> Result<Vec<FavoriteStoreWithStore>, RepositoryError> {
        let rows = sqlx::query_as::<_, FavoriteWithStoreRow>(
            r"
            SELECT f.id AS favorite_id, s.*
            FROM favorite_stores f
            JOIN stores s ON s.id = f.store_id
            WHERE f.user_id = $1
            ORDER BY f.created_at
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| FavoriteStoreWithStore {
                id: row.favorite_id,
                store: row.store,
            })
            .collect())
    }

    /// Add a store to a user's favorites.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the pair already exists (the
    /// UNIQUE constraint is the authority, so a concurrent duplicate insert
    /// also lands here). Returns `RepositoryError::NotFound` if the user or
    /// store vanished between check and write.
    pub async fn create(
        &self,
        user_id: UserId,
        store_id: StoreId,
    ) -> Result<FavoriteStore, RepositoryError> {
        let favorite = sqlx::query_as::<_, FavoriteStore>(
            r"
            INSERT INTO favorite_stores (user_id, store_id)
            VALUES ($1, $2)
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(store_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "store is already in the favorites list"))?;
        Ok(favorite)
    }

    /// Delete a favorite, returning the removed record.
    ///
    /// Returns `None` if the favorite does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        id: FavoriteStoreId,
    ) -> Result<Option<FavoriteStore>, RepositoryError> {
        let favorite = sqlx::query_as::<_, FavoriteStore>(
            "DELETE FROM favorite_stores WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(favorite)
    }
}
