//! HTTP middleware for the directory API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. `CorsLayer` (permissive, the API serves browser clients)
//!
//! Authentication is not a layer: handlers opt in through the
//! [`auth::RequireAuth`] and [`auth::RequireAdmin`] extractors, which verify
//! the bearer token before any handler logic runs.

pub mod auth;

pub use auth::{RequireAdmin, RequireAuth};
