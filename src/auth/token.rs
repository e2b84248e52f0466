//! Signed, time-bounded bearer tokens.
//!
//! Tokens are self-contained: the claims carry everything the request path
//! needs to identify the caller, so there is no server-side session table.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::repositories::user::User;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}

/// Identity claims embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i32,
    pub username: String,
    pub email: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Process-wide signing material, built once at startup from config.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_days: i64,
}

impl TokenKeys {
    #[must_use]
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_days,
        }
    }

    /// Issue a signed token for a user, valid for the configured TTL.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::days(self.ttl_days)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Invalid)
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_user() -> User {
        User {
            id: 7,
            username: "ming".to_string(),
            email: "ming@student.edu".to_string(),
            school: None,
            phone: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn issue_then_verify_resolves_claims() {
        let keys = TokenKeys::new("test-secret", 7);
        let token = keys.issue(&demo_user()).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "ming");
        assert_eq!(claims.email, "ming@student.edu");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_key_is_rejected() {
        let keys = TokenKeys::new("test-secret", 7);
        let other = TokenKeys::new("other-secret", 7);

        let token = keys.issue(&demo_user()).unwrap();
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut keys = TokenKeys::new("test-secret", 0);
        // Allow no clock skew so an already-expired token fails immediately.
        keys.validation.leeway = 0;
        keys.ttl_days = -1;

        let token = keys.issue(&demo_user()).unwrap();
        assert!(matches!(keys.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let keys = TokenKeys::new("test-secret", 7);
        assert!(matches!(
            keys.verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }
}
