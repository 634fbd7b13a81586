//! Authorization policy.
//!
//! Pure predicates over a verified [`Claims`] and a target resource. Route
//! handlers check existence and ownership in a fixed order: authenticate,
//! authorize on identity-independent facts, fetch the target (404 when
//! absent), re-check ownership against the fetched row, then act.

use campus_market_core::UserId;

use super::AuthError;
use super::token::Claims;
use crate::models::FavoriteStore;

/// Whether the actor may read or mutate the given user record.
///
/// Permitted for the user themselves and for administrators.
#[must_use]
pub fn can_act_on_user(claims: &Claims, target: UserId) -> bool {
    claims.sub == target || claims.role.is_admin()
}

/// Fail with [`AuthError::Forbidden`] unless the actor may act on the user.
///
/// # Errors
///
/// Returns `AuthError::Forbidden` when the actor is neither the target user
/// nor an administrator.
pub fn ensure_can_act_on_user(claims: &Claims, target: UserId) -> Result<(), AuthError> {
    if can_act_on_user(claims, target) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Fail with [`AuthError::Forbidden`] unless the actor is an administrator.
///
/// # Errors
///
/// Returns `AuthError::Forbidden` for non-admin actors.
pub fn require_admin(claims: &Claims) -> Result<(), AuthError> {
    if claims.role.is_admin() {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Whether the actor may act on the given favorite.
///
/// Permitted for the owning user and for administrators.
#[must_use]
pub fn can_act_on_favorite(claims: &Claims, favorite: &FavoriteStore) -> bool {
    claims.sub == favorite.user_id || claims.role.is_admin()
}

#[cfg(test)]
mod tests {
    use campus_market_core::{FavoriteStoreId, StoreId, UserRole};
    use chrono::Utc;

    use super::*;

    fn claims(id: i32, role: UserRole) -> Claims {
        Claims {
            sub: UserId::new(id),
            role,
            iat: 0,
            exp: i64::MAX,
        }
    }

    fn favorite(owner: i32) -> FavoriteStore {
        FavoriteStore {
            id: FavoriteStoreId::new(1),
            user_id: UserId::new(owner),
            store_id: StoreId::new(5),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_can_act_on_self() {
        assert!(can_act_on_user(&claims(1, UserRole::Regular), UserId::new(1)));
    }

    #[test]
    fn test_user_cannot_act_on_other() {
        assert!(!can_act_on_user(&claims(1, UserRole::Regular), UserId::new(2)));
        assert!(matches!(
            ensure_can_act_on_user(&claims(1, UserRole::Regular), UserId::new(2)),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn test_admin_can_act_on_anyone() {
        assert!(can_act_on_user(&claims(1, UserRole::Admin), UserId::new(2)));
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&claims(1, UserRole::Admin)).is_ok());
        assert!(matches!(
            require_admin(&claims(1, UserRole::Regular)),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn test_favorite_owner_and_admin_only() {
        let fav = favorite(3);
        assert!(can_act_on_favorite(&claims(3, UserRole::Regular), &fav));
        assert!(can_act_on_favorite(&claims(1, UserRole::Admin), &fav));
        assert!(!can_act_on_favorite(&claims(4, UserRole::Regular), &fav));
    }
}
