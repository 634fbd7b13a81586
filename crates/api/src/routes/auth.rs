//! Authentication route handlers: register, login, active user.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::db::{FavoriteRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::ActiveUserView;
use crate::services::auth::{AuthError, AuthService, RegisterPayload};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token issued on successful login or registration.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Handle `POST /api/auth/register`.
///
/// Validates the payload, hashes the password, creates the user, and
/// returns a bearer token with status 201.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, token) = auth.register(payload).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Handle `POST /api/auth/login`.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<TokenResponse>> {
    let email = payload.email.ok_or(AuthError::MissingField("email"))?;
    let password = payload.password.ok_or(AuthError::MissingField("password"))?;

    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, token) = auth.login(&email, &password).await?;

    tracing::debug!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse { token }))
}

/// Handle `GET /api/auth/active_user`.
///
/// Returns the authenticated user with favorite stores resolved to full
/// store records.
pub async fn active_user(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
) -> Result<Json<ActiveUserView>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    let favorites = FavoriteRepository::new(state.pool())
        .list_with_stores(user.id)
        .await?;

    Ok(Json(ActiveUserView::new(user, favorites)))
}
