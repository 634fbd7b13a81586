//! Favorite-store route handlers: list, add, remove.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use campus_market_core::{FavoriteStoreId, StoreId, UserId};

use crate::db::{FavoriteRepository, StoreRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::FavoriteStore;
use crate::services::auth::{AuthError, policy};
use crate::state::AppState;

/// Request body adding a store to a favorites list.
///
/// `userId` defaults to the caller; only administrators may add a favorite
/// on another user's behalf.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoritePayload {
    pub user_id: Option<UserId>,
    pub store_id: Option<StoreId>,
}

/// Handle `GET /api/favorite_stores`.
///
/// Returns the caller's own favorites; administrators see every favorite.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
) -> Result<Json<Vec<FavoriteStore>>> {
    let favorites = FavoriteRepository::new(state.pool());

    let list = if claims.role.is_admin() {
        favorites.list_all().await?
    } else {
        favorites.list_for_user(claims.sub).await?
    };

    Ok(Json(list))
}

/// Handle `POST /api/favorite_stores`.
///
/// At most one favorite exists per (user, store) pair; a duplicate add
/// fails with 409 and leaves exactly one row behind.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Json(payload): Json<AddFavoritePayload>,
) -> Result<impl IntoResponse> {
    let store_id = payload
        .store_id
        .ok_or_else(|| AppError::BadRequest("storeId is missing".to_owned()))?;
    let user_id = payload.user_id.unwrap_or(claims.sub);

    policy::ensure_can_act_on_user(&claims, user_id)?;

    StoreRepository::new(state.pool())
        .get(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_owned()))?;

    if user_id != claims.sub {
        UserRepository::new(state.pool())
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;
    }

    let favorite = FavoriteRepository::new(state.pool())
        .create(user_id, store_id)
        .await?;

    tracing::debug!(favorite_id = %favorite.id, user_id = %user_id, store_id = %store_id, "favorite added");
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// Handle `DELETE /api/favorite_stores/{favorite_id}`.
///
/// Owner-or-admin; the favorite is fetched first so an unknown id is 404
/// regardless of ownership.
pub async fn remove(
    State(state): State<AppState>,
    Path(favorite_id): Path<FavoriteStoreId>,
    RequireAuth(claims): RequireAuth,
) -> Result<Json<FavoriteStore>> {
    let favorites = FavoriteRepository::new(state.pool());

    let favorite = favorites
        .get(favorite_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Favorite not found".to_owned()))?;

    if !policy::can_act_on_favorite(&claims, &favorite) {
        return Err(AuthError::Forbidden.into());
    }

    let removed = favorites
        .delete(favorite_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Favorite not found".to_owned()))?;

    Ok(Json(removed))
}
