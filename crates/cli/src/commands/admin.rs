//! Administrator account management commands.

use sqlx::PgPool;
use thiserror::Error;

use campus_market_api::services::auth::hash_password;
use campus_market_core::{Email, EmailError};

/// Errors that can occur creating an administrator.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("an account with that email already exists")]
    AlreadyExists,
    #[error("password hashing failed")]
    Hash,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Create an administrator account with a hashed password.
///
/// # Errors
///
/// Returns `AdminError` if the email is invalid, the account already
/// exists, or the database is unreachable.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;
    let password_hash = hash_password(password).map_err(|_| AdminError::Hash)?;

    let database_url = std::env::var("CAMPUS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| AdminError::MissingEnvVar("CAMPUS_DATABASE_URL"))?;
    let pool = PgPool::connect(&database_url).await?;

    sqlx::query(
        "INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, $3, 'admin'::user_role)",
    )
    .bind(name)
    .bind(&email)
    .bind(&password_hash)
    .execute(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return AdminError::AlreadyExists;
        }
        AdminError::Database(e)
    })?;

    tracing::info!("Administrator {} created", email);
    Ok(())
}
