//! User route handlers: list, partial update (with avatar upload), delete.

use std::collections::HashMap;

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;

use campus_market_core::{Email, UserId, UserRole};

use crate::db::users::UserChanges;
use crate::db::{FavoriteRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{FavoriteStore, UserView, UserWithFavorites};
use crate::services::auth::{hash_password, policy};
use crate::state::AppState;

/// Updatable user fields. `None` leaves the field untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub student_id: Option<String>,
    pub level: Option<i32>,
    pub gender: Option<String>,
    pub role: Option<UserRole>,
}

/// An uploaded avatar image.
#[derive(Debug)]
pub struct AvatarUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// The parsed body of a user update request.
///
/// `PATCH /api/users/{id}` accepts either a JSON body or multipart
/// form-data; the multipart form may carry an `avatar` file part alongside
/// the text fields. This extractor normalizes both into one shape.
pub struct UserUpdate {
    pub fields: UpdateUserFields,
    pub avatar: Option<AvatarUpload>,
}

impl FromRequest<AppState> for UserUpdate {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            Self::from_multipart(multipart).await
        } else {
            let Json(fields) = Json::<UpdateUserFields>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self {
                fields,
                avatar: None,
            })
        }
    }
}

impl UserUpdate {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut fields = UpdateUserFields::default();
        let mut avatar = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "avatar" => {
                    let filename = field.file_name().unwrap_or("avatar").to_owned();
                    let content_type = field.content_type().unwrap_or_default().to_owned();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    avatar = Some(AvatarUpload {
                        filename,
                        content_type,
                        bytes,
                    });
                }
                "name" => fields.name = Some(text(field).await?),
                "email" => fields.email = Some(text(field).await?),
                "password" => fields.password = Some(text(field).await?),
                "studentId" => fields.student_id = Some(text(field).await?),
                "gender" => fields.gender = Some(text(field).await?),
                "level" => {
                    let value = text(field).await?;
                    fields.level = Some(value.parse().map_err(|_| {
                        AppError::BadRequest("Level must be a number".to_owned())
                    })?);
                }
                "role" => {
                    let value = text(field).await?;
                    fields.role = Some(value.parse::<UserRole>().map_err(AppError::BadRequest)?);
                }
                _ => {} // unknown parts are ignored
            }
        }

        Ok(Self { fields, avatar })
    }
}

async fn text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Handle `GET /api/users`.
///
/// Lists all users with their favorite-store links. Any authenticated user
/// may call this (the payload excludes password hashes).
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_claims): RequireAuth,
) -> Result<Json<Vec<UserWithFavorites>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    let favorites = FavoriteRepository::new(state.pool()).list_all().await?;

    let mut by_user: HashMap<UserId, Vec<FavoriteStore>> = HashMap::new();
    for favorite in favorites {
        by_user.entry(favorite.user_id).or_default().push(favorite);
    }

    let views = users
        .into_iter()
        .map(|user| {
            let favorite_stores = by_user.remove(&user.id).unwrap_or_default();
            UserWithFavorites {
                user: user.into(),
                favorite_stores,
            }
        })
        .collect();

    Ok(Json(views))
}

/// Handle `PATCH /api/users/{user_id}`.
///
/// Self-or-admin. Applies a partial update; an uploaded avatar replaces the
/// previous file. Only administrators may change roles.
pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    RequireAuth(claims): RequireAuth,
    update: UserUpdate,
) -> Result<Json<UserView>> {
    policy::ensure_can_act_on_user(&claims, user_id)?;

    let users = UserRepository::new(state.pool());
    let existing = users
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    if update.fields.role.is_some() {
        policy::require_admin(&claims)?;
    }

    let email = match update.fields.email {
        Some(raw) => Some(Email::parse(&raw).map_err(|e| AppError::BadRequest(e.to_string()))?),
        None => None,
    };

    let password_hash = match update.fields.password {
        Some(password) => Some(hash_password(&password)?),
        None => None,
    };

    let avatar = match &update.avatar {
        Some(upload) => Some(
            state
                .avatars()
                .save(user_id, &upload.filename, &upload.content_type, &upload.bytes)
                .await?,
        ),
        None => None,
    };

    let updated = users
        .update(
            user_id,
            UserChanges {
                name: update.fields.name,
                email,
                password_hash,
                student_id: update.fields.student_id,
                level: update.fields.level,
                gender: update.fields.gender,
                avatar: avatar.clone(),
                role: update.fields.role,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    // Drop the replaced avatar file once the new path is recorded
    if let (Some(old), Some(new)) = (existing.avatar.as_deref(), avatar.as_deref())
        && old != new
        && let Err(e) = state.avatars().remove(old).await
    {
        tracing::warn!(error = %e, path = old, "failed to remove replaced avatar");
    }

    Ok(Json(updated.into()))
}

/// Handle `DELETE /api/users/{user_id}`.
///
/// Self-or-admin. Removes the user's avatar file best-effort.
pub async fn remove(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    RequireAuth(claims): RequireAuth,
) -> Result<impl IntoResponse> {
    policy::ensure_can_act_on_user(&claims, user_id)?;

    let deleted = UserRepository::new(state.pool())
        .delete(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    if let Some(avatar) = deleted.avatar.as_deref()
        && let Err(e) = state.avatars().remove(avatar).await
    {
        tracing::warn!(error = %e, path = avatar, "failed to remove avatar of deleted user");
    }

    tracing::info!(user_id = %deleted.id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
