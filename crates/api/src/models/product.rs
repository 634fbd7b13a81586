//! Product domain types and the store-product pricing link.

use chrono::{DateTime, Utc};
use serde::Serialize;

use campus_market_core::{Price, ProductId, StoreId, StoreProductId};

use super::store::Store;

/// A product sold somewhere on campus.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Associative record pricing a product at a store.
///
/// At most one link exists per (store, product) pair, enforced by a
/// UNIQUE constraint in the schema.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoreProductLink {
    /// Unique link ID.
    pub id: StoreProductId,
    /// The store side of the link.
    pub store_id: StoreId,
    /// The product side of the link.
    pub product_id: ProductId,
    /// Price of the product at this store.
    pub price: Price,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

/// A product as listed by a store, with its price there.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedProduct {
    /// ID of the store-product link (used for unlinking).
    pub link_id: StoreProductId,
    /// Price at the listing store.
    pub price: Price,
    /// The linked product.
    pub product: Product,
}

/// A store as carrying a product, with the price there.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedStore {
    /// ID of the store-product link.
    pub link_id: StoreProductId,
    /// Price at this store.
    pub price: Price,
    /// The carrying store.
    pub store: Store,
}

/// A product with every store that carries it (product listing).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithStores {
    #[serde(flatten)]
    pub product: Product,
    pub stores: Vec<LinkedStore>,
}
