//! Store route handlers: CRUD plus the store-product pricing links.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use campus_market_core::{Price, ProductId, StoreId, StoreProductId};

use crate::db::stores::StoreChanges;
use crate::db::{ProductRepository, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{LinkedProduct, Store, StoreProductLink};
use crate::state::AppState;

/// Query parameters for the store listing.
#[derive(Debug, Deserialize)]
pub struct StoreFilter {
    /// Restrict the listing to one store type.
    #[serde(rename = "type")]
    pub store_type: Option<String>,
}

/// Store creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateStorePayload {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub store_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Partial store update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStorePayload {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub store_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Request body linking a product to a store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkProductPayload {
    pub product_id: Option<ProductId>,
    pub price: Option<f64>,
}

/// Handle `GET /api/stores`. Open to anyone.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<StoreFilter>,
) -> Result<Json<Vec<Store>>> {
    let stores = StoreRepository::new(state.pool())
        .list(filter.store_type.as_deref())
        .await?;
    Ok(Json(stores))
}

/// Handle `GET /api/stores/{store_id}`. Open to anyone.
pub async fn show(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Store>> {
    let store = StoreRepository::new(state.pool())
        .get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_owned()))?;
    Ok(Json(store))
}

/// Handle `POST /api/stores`. Administrators only.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
    Json(payload): Json<CreateStorePayload>,
) -> Result<impl IntoResponse> {
    let name = payload
        .name
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("name is missing".to_owned()))?;
    let latitude = payload
        .latitude
        .ok_or_else(|| AppError::BadRequest("latitude is missing".to_owned()))?;
    let longitude = payload
        .longitude
        .ok_or_else(|| AppError::BadRequest("longitude is missing".to_owned()))?;

    let store = StoreRepository::new(state.pool())
        .create(&name, payload.store_type.as_deref(), latitude, longitude)
        .await?;

    tracing::info!(store_id = %store.id, "store created");
    Ok((StatusCode::CREATED, Json(store)))
}

/// Handle `PATCH /api/stores/{store_id}`. Administrators only.
pub async fn update(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    RequireAdmin(_claims): RequireAdmin,
    Json(payload): Json<UpdateStorePayload>,
) -> Result<Json<Store>> {
    let store = StoreRepository::new(state.pool())
        .update(
            store_id,
            StoreChanges {
                name: payload.name,
                store_type: payload.store_type,
                latitude: payload.latitude,
                longitude: payload.longitude,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_owned()))?;
    Ok(Json(store))
}

/// Handle `DELETE /api/stores/{store_id}`. Administrators only.
pub async fn remove(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    RequireAdmin(_claims): RequireAdmin,
) -> Result<impl IntoResponse> {
    let deleted = StoreRepository::new(state.pool())
        .delete(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_owned()))?;

    tracing::info!(store_id = %deleted.id, "store deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Handle `GET /api/stores/{store_id}/products`. Open to anyone.
pub async fn list_products(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<LinkedProduct>>> {
    // 404 for an unknown store rather than an empty listing
    StoreRepository::new(state.pool())
        .get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_owned()))?;

    let products = ProductRepository::new(state.pool())
        .products_for_store(store_id)
        .await?;
    Ok(Json(products))
}

/// Handle `POST /api/stores/{store_id}/products`. Administrators only.
///
/// Links a product to the store with a price. The price must be a
/// non-negative number; the (store, product) pair must not already be
/// linked.
pub async fn link_product(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    RequireAdmin(_claims): RequireAdmin,
    Json(payload): Json<LinkProductPayload>,
) -> Result<impl IntoResponse> {
    let product_id = payload
        .product_id
        .ok_or_else(|| AppError::BadRequest("productId is missing".to_owned()))?;
    let raw_price = payload
        .price
        .ok_or_else(|| AppError::BadRequest("price is missing".to_owned()))?;

    // Validate the price before touching the database
    let amount = Decimal::try_from(raw_price)
        .map_err(|_| AppError::BadRequest("price must be a number".to_owned()))?;
    let price = Price::new(amount).map_err(|e| AppError::BadRequest(e.to_string()))?;

    StoreRepository::new(state.pool())
        .get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_owned()))?;

    let products = ProductRepository::new(state.pool());
    products
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    let link = products.link(store_id, product_id, price).await?;

    tracing::info!(link_id = %link.id, store_id = %store_id, product_id = %product_id, "product linked to store");
    Ok((StatusCode::CREATED, Json(link)))
}

/// Handle `DELETE /api/stores/{store_id}/products/{link_id}`.
/// Administrators only.
pub async fn unlink_product(
    State(state): State<AppState>,
    Path((store_id, link_id)): Path<(StoreId, StoreProductId)>,
    RequireAdmin(_claims): RequireAdmin,
) -> Result<Json<StoreProductLink>> {
    let removed = ProductRepository::new(state.pool())
        .unlink(store_id, link_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Link not found".to_owned()))?;

    tracing::info!(link_id = %removed.id, "product unlinked from store");
    Ok(Json(removed))
}
