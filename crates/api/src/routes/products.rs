//! Product route handlers: list, create, rename.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use campus_market_core::{Price, ProductId, StoreId};

use crate::db::{ProductRepository, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::ProductWithStores;
use crate::state::AppState;

/// Product creation request body.
///
/// `storeId`/`price` optionally link the new product to a store at
/// creation; the price defaults to zero when omitted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub name: Option<String>,
    pub store_id: Option<StoreId>,
    pub price: Option<f64>,
}

/// Product rename request body.
#[derive(Debug, Deserialize)]
pub struct UpdateProductPayload {
    pub name: Option<String>,
}

/// Handle `GET /api/products`. Open to anyone.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductWithStores>>> {
    let products = ProductRepository::new(state.pool())
        .list_with_stores()
        .await?;
    Ok(Json(products))
}

/// Handle `POST /api/products`. Administrators only.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse> {
    let name = payload
        .name
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("name is missing".to_owned()))?;

    let link = match payload.store_id {
        Some(store_id) => {
            let amount = match payload.price {
                Some(raw) => Decimal::try_from(raw)
                    .map_err(|_| AppError::BadRequest("price must be a number".to_owned()))?,
                None => Decimal::ZERO,
            };
            let price = Price::new(amount).map_err(|e| AppError::BadRequest(e.to_string()))?;

            StoreRepository::new(state.pool())
                .get(store_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Store not found".to_owned()))?;

            Some((store_id, price))
        }
        None => None,
    };

    let products = ProductRepository::new(state.pool());
    let product = products.create_with_link(&name, link).await?;
    let with_stores = products
        .get_with_stores(product.id)
        .await?
        .ok_or_else(|| AppError::Internal("created product vanished".to_owned()))?;

    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(with_stores)))
}

/// Handle `PATCH /api/products/{product_id}`. Administrators only.
pub async fn update(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    RequireAdmin(_claims): RequireAdmin,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<ProductWithStores>> {
    let name = payload
        .name
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("name is missing".to_owned()))?;

    let products = ProductRepository::new(state.pool());
    products
        .rename(product_id, &name)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    let with_stores = products
        .get_with_stores(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;
    Ok(Json(with_stores))
}
