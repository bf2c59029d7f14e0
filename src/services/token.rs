//! Session token signing and verification
//!
//! Tokens are HS256 JWTs carrying `{role, iat, exp}`. Verification never
//! errors: anything wrong with a token yields `None`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::Role;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "auth-token";

/// Session lifetime: 24 hours
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Decoded contents of a valid token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub role: Role,
    /// Issued-at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token signing secret is not configured")]
    MissingSecret,

    #[error("Failed to sign token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies signed session tokens with one process-wide key.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Build a token service with the standard 24 hour lifetime.
    ///
    /// Fails if `secret` is empty; the server must not start without a key.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(SESSION_TTL_SECS),
        })
    }

    /// Issue a token for `role`, valid from now.
    pub fn issue(&self, role: Role) -> Result<String, TokenError> {
        self.issue_at(role, Utc::now())
    }

    pub fn issue_at(&self, role: Role, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = SessionClaims {
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`.
    ///
    /// `decode` checks the signature and rejects `exp` before the wall clock;
    /// the session also ends once `now` reaches `exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<SessionClaims> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .ok()?;

        if now.timestamp() >= claims.exp || claims.iat > claims.exp {
            return None;
        }
        Some(claims)
    }
}
