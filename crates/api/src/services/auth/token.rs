//! Bearer token codec.
//!
//! Tokens are HS256 JSON Web Tokens carrying the user's id and role, valid
//! for seven days from issuance. Nothing is stored server-side: validity is
//! entirely determined by the signature and the expiry claim.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use campus_market_core::{UserId, UserRole};

use super::AuthError;

/// Token time-to-live: seven days.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// The identity claim embedded in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id.
    pub sub: UserId,
    /// The user's role at issuance time.
    pub role: UserRole,
    /// Issued-at (Unix timestamp). Makes two tokens for the same identity
    /// distinct bytes when issued at different times.
    pub iat: i64,
    /// Absolute expiry (Unix timestamp).
    pub exp: i64,
}

/// Signs and verifies bearer tokens with a process-wide secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    /// Build a codec from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a signed token for a user, expiring seven days from now.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenIssue` if signing fails.
    pub fn issue(&self, user_id: UserId, role: UserRole) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            role,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(AuthError::TokenIssue)
    }

    /// Verify a token and return the embedded claim.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` if the signature is valid but the
    /// expiry has passed, `AuthError::InvalidToken` for anything else
    /// (tampered or malformed input).
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(&SecretString::from("kJ8#mN2$pQ5&rT9*uW3^xZ6!aB4@cD7%"))
    }

    #[test]
    fn test_issue_then_verify_returns_claim() {
        let codec = codec();
        let token = codec.issue(UserId::new(7), UserRole::Admin).unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, UserId::new(7));
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = codec();
        // Sign an already-expired claim directly, well past the default leeway
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new(7),
            role: UserRole::Regular,
            iat: now - TOKEN_TTL_SECS - 3600,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &codec.encoding).unwrap();

        assert!(matches!(codec.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = codec();
        let mut token = codec.issue(UserId::new(7), UserRole::Regular).unwrap();

        // Flip the last signature character
        let last = token.pop().unwrap();
        token.push(if last == 'A' { 'B' } else { 'A' });

        assert!(matches!(codec.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = codec().issue(UserId::new(7), UserRole::Regular).unwrap();
        let other = TokenCodec::new(&SecretString::from("zY1!xW4$vU7&tS0*rQ3^pN6@mL9#kJ2%"));

        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(matches!(
            codec().verify("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_distinct_issuance_times_yield_distinct_tokens() {
        let codec = codec();
        let a = codec.issue(UserId::new(7), UserRole::Regular).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let b = codec.issue(UserId::new(7), UserRole::Regular).unwrap();
        assert_ne!(a, b);
    }
}
