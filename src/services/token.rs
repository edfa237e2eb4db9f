//! Bearer token issuing and verification (HS256 JWT).

use anyhow::ensure;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::errors::{AppError, AppResult, TokenError};

/// Claims carried by every token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Builds a service around an explicitly configured secret. There is no
    /// fallback: an empty secret is refused.
    pub fn new(secret: &str, ttl: Duration) -> anyhow::Result<Self> {
        ensure!(!secret.is_empty(), "token secret must not be empty");
        ensure!(ttl > Duration::zero(), "token lifetime must be positive");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Issues a token for `user_id` that expires one TTL from now.
    pub fn issue(&self, user_id: &str) -> AppResult<String> {
        self.issue_at(user_id, Utc::now())
    }

    fn issue_at(&self, user_id: &str, issued_at: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        debug!("Issuing token for user {}, expires at {}", user_id, claims.exp);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verifies signature and expiry, returning the user id the token was issued for.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if data.claims.sub.is_empty() {
            return Err(TokenError::Malformed);
        }
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, Duration::hours(1)).unwrap()
    }

    #[test]
    fn issued_token_verifies_to_same_user() {
        let tokens = service("test-secret-key-12345");
        let token = tokens.issue("user-1").unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), "user-1");
    }

    #[test]
    fn token_fails_after_expiry() {
        let tokens = service("test-secret-key-12345");
        let issued_at = Utc::now() - Duration::hours(1) - Duration::seconds(5);
        let token = tokens.issue_at("user-1", issued_at).unwrap();
        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_valid_just_before_expiry() {
        let tokens = service("test-secret-key-12345");
        let issued_at = Utc::now() - Duration::minutes(59);
        let token = tokens.issue_at("user-1", issued_at).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), "user-1");
    }

    #[test]
    fn different_secrets_reject() {
        let token = service("secret1").issue("user-1").unwrap();
        assert_eq!(service("secret2").verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let tokens = service("secret");
        assert_eq!(tokens.verify("invalid.token.here"), Err(TokenError::Malformed));
        assert_eq!(tokens.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(TokenService::new("", Duration::hours(1)).is_err());
    }

    #[test]
    fn default_lifetime_is_one_hour() {
        let tokens = service("secret");
        let token = tokens.issue("user-1").unwrap();
        let claims = decode::<Claims>(&token, &tokens.decoding, &tokens.validation)
            .unwrap()
            .claims;
        assert_eq!(claims.exp - claims.iat, 3600);
    }
}
