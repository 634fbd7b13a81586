//! Store domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use campus_market_core::StoreId;

/// A campus store with its map position.
///
/// Readable by anyone; created, updated, and deleted by administrators only.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Store name.
    pub name: String,
    /// Free-form category, e.g. "cafe" or "bookstore".
    #[serde(rename = "type")]
    pub store_type: Option<String>,
    /// Map latitude.
    pub latitude: f64,
    /// Map longitude.
    pub longitude: f64,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
    /// When the store was last updated.
    pub updated_at: DateTime<Utc>,
}
