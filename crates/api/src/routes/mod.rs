//! HTTP route handlers for the directory API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (verifies database)
//!
//! # Auth
//! POST /api/auth/login          - {email, password} -> {token}
//! POST /api/auth/register       - registration -> {token} (201)
//! GET  /api/auth/active_user    - current user with favorite stores resolved
//!
//! # Users (bearer)
//! GET    /api/users             - list all users
//! PATCH  /api/users/{id}        - partial update, self-or-admin; JSON or
//!                                 multipart with an `avatar` file part
//! DELETE /api/users/{id}        - delete, self-or-admin
//!
//! # Stores (read open; writes admin)
//! GET    /api/stores[?type=]    - list, optional type filter
//! POST   /api/stores            - create
//! GET    /api/stores/{id}       - fetch one
//! PATCH  /api/stores/{id}       - partial update
//! DELETE /api/stores/{id}       - delete
//! GET    /api/stores/{id}/products            - linked products with prices
//! POST   /api/stores/{id}/products            - link a product with a price
//! DELETE /api/stores/{id}/products/{link_id}  - unlink
//!
//! # Products (read open; writes admin)
//! GET   /api/products           - list with carrying stores
//! POST  /api/products           - create, optionally linked to a store
//! PATCH /api/products/{id}      - rename
//!
//! # Favorites (bearer)
//! GET    /api/favorite_stores       - own favorites (all when admin)
//! POST   /api/favorite_stores       - add, self unless admin
//! DELETE /api/favorite_stores/{id}  - remove, owner-or-admin
//! ```

pub mod auth;
pub mod favorites;
pub mod products;
pub mod stores;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/active_user", get(auth::active_user))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route("/{user_id}", patch(users::update).delete(users::remove))
}

/// Create the store routes router, including product links.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::list).post(stores::create))
        .route(
            "/{store_id}",
            get(stores::show)
                .patch(stores::update)
                .delete(stores::remove),
        )
        .route(
            "/{store_id}/products",
            get(stores::list_products).post(stores::link_product),
        )
        .route(
            "/{store_id}/products/{link_id}",
            delete(stores::unlink_product),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/{product_id}", patch(products::update))
}

/// Create the favorite-store routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::list).post(favorites::add))
        .route("/{favorite_id}", delete(favorites::remove))
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/stores", store_routes())
        .nest("/products", product_routes())
        .nest("/favorite_stores", favorite_routes())
}
