//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication and authorization.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required registration field is absent.
    #[error("{0} is missing")]
    MissingField(&'static str),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] campus_market_core::EmailError),

    /// Password too weak.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Wrong password for an existing account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account with the given email.
    #[error("user not found")]
    UserNotFound,

    /// Email or student ID already registered.
    #[error("email or student id already in use")]
    AlreadyRegistered,

    /// Request carried no bearer token.
    #[error("no token provided")]
    MissingToken,

    /// Token signature did not verify (tampered or malformed).
    #[error("invalid token")]
    InvalidToken,

    /// Token signature verified but the expiry has passed.
    #[error("token expired")]
    TokenExpired,

    /// Token could not be signed.
    #[error("token issuance failed")]
    TokenIssue(#[source] jsonwebtoken::errors::Error),

    /// Authenticated but not permitted to perform the action.
    #[error("forbidden")]
    Forbidden,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
