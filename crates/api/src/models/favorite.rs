//! Favorite-store link types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use campus_market_core::{FavoriteStoreId, StoreId, UserId};

use super::store::Store;

/// Associative record marking a store as a user's favorite.
///
/// At most one favorite exists per (user, store) pair, enforced by a
/// UNIQUE constraint in the schema.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStore {
    /// Unique favorite ID.
    pub id: FavoriteStoreId,
    /// Owning user.
    pub user_id: UserId,
    /// The favorited store.
    pub store_id: StoreId,
    /// When the favorite was created.
    pub created_at: DateTime<Utc>,
}

/// A favorite with the store record resolved (active-user payload).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStoreWithStore {
    /// ID of the favorite link (used for removal).
    pub id: FavoriteStoreId,
    /// The favorited store.
    pub store: Store,
}
