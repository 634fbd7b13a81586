//! User domain types and API views.

use chrono::{DateTime, Utc};
use serde::Serialize;

use campus_market_core::{Email, UserId, UserRole};

use super::favorite::{FavoriteStore, FavoriteStoreWithStore};

/// A directory user (domain type).
///
/// Holds the password hash and is therefore never serialized directly;
/// API responses go through [`UserView`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address (unique).
    pub email: Email,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Optional campus student ID (unique where present).
    pub student_id: Option<String>,
    /// Study level.
    pub level: i32,
    /// Self-reported gender.
    pub gender: Option<String>,
    /// Web path of the uploaded avatar, if any.
    pub avatar: Option<String>,
    /// Role controlling write access.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Serialized user representation. Excludes the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub student_id: Option<String>,
    pub level: i32,
    pub gender: Option<String>,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            student_id: user.student_id,
            level: user.level,
            gender: user.gender,
            avatar: user.avatar,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A user together with their favorite-store links (user listing).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithFavorites {
    #[serde(flatten)]
    pub user: UserView,
    pub favorite_stores: Vec<FavoriteStore>,
}

/// The authenticated user with favorite stores resolved to store records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUserView {
    #[serde(flatten)]
    pub user: UserView,
    pub favorite_stores: Vec<FavoriteStoreWithStore>,
}

impl ActiveUserView {
    #[must_use]
    pub fn new(user: User, favorite_stores: Vec<FavoriteStoreWithStore>) -> Self {
        Self {
            user: user.into(),
            favorite_stores,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: UserId::new(1),
            name: "Dana".to_owned(),
            email: Email::parse("dana@campus.edu").unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_owned(),
            student_id: Some("S-1001".to_owned()),
            level: 2,
            gender: None,
            avatar: None,
            role: UserRole::Regular,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_view_excludes_password_hash() {
        let view = UserView::from(sample_user());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "dana@campus.edu");
        assert_eq!(json["studentId"], "S-1001");
    }

    #[test]
    fn test_active_user_flattens_user_fields() {
        let view = ActiveUserView::new(sample_user(), vec![]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["favoriteStores"], serde_json::json!([]));
    }
}
