//! Authentication service.
//!
//! Registration and login over the user repository, plus the bearer token
//! codec and the authorization policy.

mod error;
pub mod policy;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, TokenCodec};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use sqlx::PgPool;

use campus_market_core::Email;

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration request body.
///
/// Fields are optional at the serde layer so a missing field surfaces as a
/// named validation error rather than a generic deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub level: Option<i32>,
    pub student_id: Option<String>,
    pub gender: Option<String>,
}

/// A validated registration, ready to persist.
#[derive(Debug)]
struct ValidRegistration {
    name: String,
    password: String,
    email: Email,
    level: i32,
    student_id: Option<String>,
    gender: Option<String>,
}

impl RegisterPayload {
    /// Check required fields in a fixed order and report the first missing
    /// one, then validate formats.
    fn validate(self) -> Result<ValidRegistration, AuthError> {
        let name = self.name.filter(|s| !s.is_empty());
        let password = self.password.filter(|s| !s.is_empty());
        let email = self.email.filter(|s| !s.is_empty());

        let name = name.ok_or(AuthError::MissingField("name"))?;
        let password = password.ok_or(AuthError::MissingField("password"))?;
        let email = email.ok_or(AuthError::MissingField("email"))?;
        let level = self.level.ok_or(AuthError::MissingField("level"))?;

        let email = Email::parse(&email)?;
        validate_password(&password)?;

        Ok(ValidRegistration {
            name,
            password,
            email,
            level,
            student_id: self.student_id.filter(|s| !s.is_empty()),
            gender: self.gender,
        })
    }
}

/// Authentication service.
///
/// Handles user registration and login, issuing bearer tokens on success.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenCodec,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenCodec) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for an absent required field,
    /// `AuthError::InvalidEmail`/`AuthError::WeakPassword` for format
    /// failures, and `AuthError::AlreadyRegistered` if the email or student
    /// ID is taken.
    pub async fn register(&self, payload: RegisterPayload) -> Result<(User, String), AuthError> {
        let reg = payload.validate()?;

        // Friendlier error than the constraint violation; the UNIQUE
        // constraints still win a check-then-write race.
        if self
            .users
            .email_or_student_id_taken(&reg.email, reg.student_id.as_deref())
            .await?
        {
            return Err(AuthError::AlreadyRegistered);
        }

        let password_hash = hash_password(&reg.password)?;

        let user = self
            .users
            .create(NewUser {
                name: reg.name,
                email: reg.email,
                password_hash,
                student_id: reg.student_id,
                level: reg.level,
                gender: reg.gender,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AlreadyRegistered,
                other => AuthError::Repository(other),
            })?;

        let token = self.tokens.issue(user.id, user.role)?;
        Ok((user, token))
    }

    /// Login with email and password, issuing a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account has that email and
    /// `AuthError::InvalidCredentials` if the password does not match the
    /// stored hash.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &user.password_hash)?;

        let token = self.tokens.issue(user.id, user.role)?;
        Ok((user, token))
    }
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with argon2 and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored argon2 hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch and
/// `AuthError::PasswordHash` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(password_hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn full_payload() -> RegisterPayload {
        RegisterPayload {
            name: Some("Dana".to_owned()),
            password: Some("correct horse battery".to_owned()),
            email: Some("dana@campus.edu".to_owned()),
            level: Some(2),
            student_id: Some("S-1001".to_owned()),
            gender: None,
        }
    }

    #[test]
    fn test_validate_accepts_full_payload() {
        let reg = full_payload().validate().unwrap();
        assert_eq!(reg.name, "Dana");
        assert_eq!(reg.email.as_str(), "dana@campus.edu");
        assert_eq!(reg.student_id.as_deref(), Some("S-1001"));
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let payload = RegisterPayload {
            name: None,
            password: None,
            email: None,
            level: None,
            student_id: None,
            gender: None,
        };
        assert!(matches!(
            payload.validate(),
            Err(AuthError::MissingField("name"))
        ));

        let payload = RegisterPayload {
            password: None,
            ..full_payload()
        };
        assert!(matches!(
            payload.validate(),
            Err(AuthError::MissingField("password"))
        ));

        let payload = RegisterPayload {
            level: None,
            ..full_payload()
        };
        assert!(matches!(
            payload.validate(),
            Err(AuthError::MissingField("level"))
        ));
    }

    #[test]
    fn test_validate_empty_string_counts_as_missing() {
        let payload = RegisterPayload {
            email: Some(String::new()),
            ..full_payload()
        };
        assert!(matches!(
            payload.validate(),
            Err(AuthError::MissingField("email"))
        ));
    }

    #[test]
    fn test_validate_student_id_is_optional() {
        let payload = RegisterPayload {
            student_id: None,
            ..full_payload()
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let payload = RegisterPayload {
            email: Some("not-an-email".to_owned()),
            ..full_payload()
        };
        assert!(matches!(
            payload.validate(),
            Err(AuthError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_validate_rejects_short_password() {
        let payload = RegisterPayload {
            password: Some("short".to_owned()),
            ..full_payload()
        };
        assert!(matches!(
            payload.validate(),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password!", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("correct horse battery").unwrap();
        let b = hash_password("correct horse battery").unwrap();
        assert_ne!(a, b);
    }
}
