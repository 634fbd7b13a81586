//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`, and every failure path terminates the request;
//! there is no continue-after-error.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::avatar::AvatarError;

/// Application-level error type for the directory API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication or authorization failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Avatar upload failed.
    #[error("Avatar error: {0}")]
    Avatar(#[from] AvatarError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authenticated but not permitted.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AuthError::MissingField(_)
                | AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                // Identity failed
                AuthError::InvalidCredentials | AuthError::TokenExpired => {
                    StatusCode::UNAUTHORIZED
                }
                // Permission failed
                AuthError::MissingToken | AuthError::InvalidToken | AuthError::Forbidden => {
                    StatusCode::FORBIDDEN
                }
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::AlreadyRegistered => StatusCode::CONFLICT,
                AuthError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
                AuthError::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
                AuthError::Repository(RepositoryError::Database(_))
                | AuthError::TokenIssue(_)
                | AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Avatar(err) => match err {
                AvatarError::NotAnImage | AvatarError::BadFilename => StatusCode::BAD_REQUEST,
                AvatarError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal detail is never exposed on 500s.
    fn message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::MissingToken => "No token provided".to_owned(),
                AuthError::TokenExpired => "Token expired".to_owned(),
                AuthError::InvalidToken => "Invalid token".to_owned(),
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::UserNotFound => "User not found".to_owned(),
                AuthError::AlreadyRegistered => "Email or Student ID already in use".to_owned(),
                AuthError::Forbidden => {
                    "You are not authorized to make this request".to_owned()
                }
                AuthError::MissingField(_)
                | AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_) => err.to_string(),
                AuthError::Repository(RepositoryError::NotFound) => "Not found".to_owned(),
                AuthError::Repository(RepositoryError::Conflict(msg)) => msg.clone(),
                AuthError::Repository(RepositoryError::Database(_))
                | AuthError::TokenIssue(_)
                | AuthError::PasswordHash => "Internal server error".to_owned(),
            },
            Self::Database(err) => match err {
                RepositoryError::NotFound => "Not found".to_owned(),
                RepositoryError::Conflict(msg) => msg.clone(),
                RepositoryError::Database(_) => "Internal server error".to_owned(),
            },
            Self::Avatar(err) => match err {
                AvatarError::Io(_) => "Internal server error".to_owned(),
                other => other.to_string(),
            },
            Self::Internal(_) => "Internal server error".to_owned(),
            Self::NotFound(msg) | Self::Forbidden(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }

    fn is_server_error(&self) -> bool {
        self.status() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = Json(json!({ "message": self.message() }));
        (self.status(), body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_missing_token_is_403() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::MissingToken)),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_invalid_token_is_403() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidToken)),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_expired_token_is_401() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::TokenExpired)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_bad_credentials_is_401() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_missing_field_is_400() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::MissingField("name"))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_duplicate_registration_is_409() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::AlreadyRegistered)),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_repository_conflict_is_409() {
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict(
                "duplicate".to_owned()
            ))),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_not_found_is_404() {
        assert_eq!(
            get_status(AppError::NotFound("store not found".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_forbidden_is_403() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::Forbidden)),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let err = AppError::Internal("connection pool exhausted at 10.0.0.3".to_owned());
        assert_eq!(err.message(), "Internal server error");
    }
}
