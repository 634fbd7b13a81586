//! Product repository, including the store-product pricing links.

use std::collections::HashMap;

use sqlx::PgPool;

use campus_market_core::{Price, ProductId, StoreId, StoreProductId};

use super::{RepositoryError, map_constraint_violation};
use crate::models::{LinkedProduct, LinkedStore, Product, ProductWithStores, Store, StoreProductLink};

/// Row for a product as listed by a store.
#[derive(Debug, sqlx::FromRow)]
struct LinkedProductRow {
    link_id: StoreProductId,
    price: Price,
    #[sqlx(flatten)]
    product: Product,
}

/// Row for a store carrying a product.
#[derive(Debug, sqlx::FromRow)]
struct LinkedStoreRow {
    product_id: ProductId,
    link_id: StoreProductId,
    price: Price,
    #[sqlx(flatten)]
    store: Store,
}

/// Repository for product and store-product link operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(product)
    }

    /// List all products with the stores carrying them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_with_stores(&self) -> Result<Vec<ProductWithStores>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name")
            .fetch_all(self.pool)
            .await?;

        let rows = sqlx::query_as::<_, LinkedStoreRow>(
            r"
            SELECT sp.product_id, sp.id AS link_id, sp.price, s.*
            FROM store_products sp
            JOIN stores s ON s.id = sp.store_id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut by_product: HashMap<ProductId, Vec<LinkedStore>> = HashMap::new();
        for row in rows {
            by_product.entry(row.product_id).or_default().push(LinkedStore {
                link_id: row.link_id,
                price: row.price,
                store: row.store,
            });
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let stores = by_product.remove(&product.id).unwrap_or_default();
                ProductWithStores { product, stores }
            })
            .collect())
    }

    /// Get one product with the stores carrying it.
    ///
    /// Returns `None` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_stores(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithStores>, RepositoryError> {
        let Some(product) = self.get(id).await? else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, LinkedStoreRow>(
            r"
            SELECT sp.product_id, sp.id AS link_id, sp.price, s.*
            FROM store_products sp
            JOIN stores s ON s.id = sp.store_id
            WHERE sp.product_id = $1
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        let stores = rows
            .into_iter()
            .map(|row| LinkedStore {
                link_id: row.link_id,
                price: row.price,
                store: row.store,
            })
            .collect();

        Ok(Some(ProductWithStores { product, stores }))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, name: &str) -> Result<Product, RepositoryError> {
        let product =
            sqlx::query_as::<_, Product>("INSERT INTO products (name) VALUES ($1) RETURNING *")
                .bind(name)
                .fetch_one(self.pool)
                .await?;
        Ok(product)
    }

    /// Create a product, optionally linking it to a store with a price.
    ///
    /// The insert and the link are one transaction: a failure on the link
    /// leaves no orphan product behind.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store vanished between
    /// check and write.
    pub async fn create_with_link(
        &self,
        name: &str,
        link: Option<(StoreId, Price)>,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let product =
            sqlx::query_as::<_, Product>("INSERT INTO products (name) VALUES ($1) RETURNING *")
                .bind(name)
                .fetch_one(&mut *tx)
                .await?;

        if let Some((store_id, price)) = link {
            sqlx::query(
                "INSERT INTO store_products (store_id, product_id, price) VALUES ($1, $2, $3)",
            )
            .bind(store_id)
            .bind(product.id)
            .bind(price)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_constraint_violation(e, "product is already linked to this store"))?;
        }

        tx.commit().await?;
        Ok(product)
    }

    /// Rename a product.
    ///
    /// Returns `None` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn rename(
        &self,
        id: ProductId,
        name: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET name = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    /// List the products linked to a store, with their prices there.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<LinkedProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, LinkedProductRow>(
            r"
            SELECT sp.id AS link_id, sp.price, p.*
            FROM store_products sp
            JOIN products p ON p.id = sp.product_id
            WHERE sp.store_id = $1
            ORDER BY p.name
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| LinkedProduct {
                link_id: row.link_id,
                price: row.price,
                product: row.product,
            })
            .collect())
    }

    /// Link a product to a store with a price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the pair is already linked
    /// (the UNIQUE constraint is the authority, so a concurrent duplicate
    /// insert also lands here). Returns `RepositoryError::NotFound` if the
    /// store or product vanished between check and write.
    pub async fn link(
        &self,
        store_id: StoreId,
        product_id: ProductId,
        price: Price,
    ) -> Result<StoreProductLink, RepositoryError> {
        let link = sqlx::query_as::<_, StoreProductLink>(
            r"
            INSERT INTO store_products (store_id, product_id, price)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(store_id)
        .bind(product_id)
        .bind(price)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "product is already linked to this store"))?;
        Ok(link)
    }

    /// Remove a store-product link, returning the removed record.
    ///
    /// Returns `None` if no such link exists for the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unlink(
        &self,
        store_id: StoreId,
        link_id: StoreProductId,
    ) -> Result<Option<StoreProductLink>, RepositoryError> {
        let link = sqlx::query_as::<_, StoreProductLink>(
            "DELETE FROM store_products WHERE id = $1 AND store_id = $2 RETURNING *",
        )
        .bind(link_id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(link)
    }
}
