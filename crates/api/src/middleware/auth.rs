//! Authentication extractors.
//!
//! Provides extractors for requiring a verified bearer token in route
//! handlers. Verification happens here, inside the extractor, so a handler
//! can never run with an unverified token: a missing, tampered, or expired
//! token short-circuits the request with the appropriate status before any
//! handler logic executes.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use crate::error::AppError;
use crate::services::auth::{AuthError, Claims, policy};
use crate::state::AppState;

/// Extractor that requires a verified bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(claims): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", claims.sub)
/// }
/// ```
pub struct RequireAuth(pub Claims);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_bearer(parts, state)?;
        Ok(Self(claims))
    }
}

/// Extractor that requires a verified bearer token carrying the admin role.
///
/// Rejects with 403 before the handler runs when the caller is not an
/// administrator.
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_bearer(parts, state)?;
        policy::require_admin(&claims)?;
        Ok(Self(claims))
    }
}

/// Extract and verify the `Authorization: Bearer` token.
fn verify_bearer(parts: &Parts, state: &AppState) -> Result<Claims, AuthError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?;

    state.tokens().verify(token)
}
