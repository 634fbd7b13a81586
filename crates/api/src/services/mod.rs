//! Business logic services for the directory API.
//!
//! # Services
//!
//! - `auth` - Registration, login, token codec, authorization policy
//! - `avatar` - Avatar file storage under the uploads directory

pub mod auth;
pub mod avatar;

pub use avatar::{AvatarError, AvatarStore};
