//! Database operations for the campus directory `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Accounts with argon2 password hashes
//! - `stores` - Campus stores with map coordinates
//! - `products` - Product catalog
//! - `store_products` - Store↔product pricing links, UNIQUE(store_id, product_id)
//! - `favorite_stores` - User↔store favorites, UNIQUE(user_id, store_id)
//!
//! The UNIQUE constraints are the authority for the pair-uniqueness
//! invariants: a concurrent duplicate insert surfaces as a unique violation
//! and is mapped to [`RepositoryError::Conflict`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p campus-market-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod favorites;
pub mod products;
pub mod stores;
pub mod users;

pub use favorites::FavoriteRepository;
pub use products::ProductRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Errors that can occur in repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, duplicate link).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map an insert/update error onto the repository error vocabulary.
///
/// Unique violations become [`RepositoryError::Conflict`]; foreign-key
/// violations mean a referenced row vanished between check and write and
/// become [`RepositoryError::NotFound`].
pub(crate) fn map_constraint_violation(e: sqlx::Error, conflict_msg: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(conflict_msg.to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound;
        }
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
