//! Domain models for the campus directory.
//!
//! Database rows decode directly into these types (the newtype IDs, `Email`,
//! `Price`, and `UserRole` all carry sqlx implementations). Types that cross
//! the API boundary get a dedicated serialized view where the domain type
//! holds data that must not leak (`User::password_hash`).

pub mod favorite;
pub mod product;
pub mod store;
pub mod user;

pub use favorite::{FavoriteStore, FavoriteStoreWithStore};
pub use product::{LinkedProduct, LinkedStore, Product, ProductWithStores, StoreProductLink};
pub use store::Store;
pub use user::{ActiveUserView, User, UserView, UserWithFavorites};
