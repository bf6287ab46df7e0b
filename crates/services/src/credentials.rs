//! Password hashing and session-token issuance.
//!
//! Sessions follow a stateless bearer model: the signed token is the whole
//! session. There is no server-side session store and no revocation; a token
//! simply expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use coach_core::model::AccountSummary;

/// How long an issued session token stays valid.
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CredentialError {
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("failed to sign session token: {0}")]
    Token(String),
    #[error("invalid session token: {0}")]
    InvalidToken(String),
}

/// Claims embedded in a session token: account id, email, issue and expiry
/// times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: u64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Hashes passwords (salted bcrypt) and signs session tokens (HS256).
#[derive(Clone)]
pub struct CredentialService {
    secret: String,
}

impl CredentialService {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Hash a plaintext password with a per-password salt.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Hash` if bcrypt fails.
    pub fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| CredentialError::Hash(e.to_string()))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Hash` if the stored hash is malformed.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        bcrypt::verify(password, hash).map_err(|e| CredentialError::Hash(e.to_string()))
    }

    /// Issue a token bound to the account's id and email, valid for 24 hours
    /// from `now`.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Token` if signing fails.
    pub fn issue_token(
        &self,
        account: &AccountSummary,
        now: DateTime<Utc>,
    ) -> Result<String, CredentialError> {
        let claims = SessionClaims {
            sub: account.id.value(),
            email: account.email.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| CredentialError::Token(e.to_string()))
    }

    /// Decode and validate a token issued by [`issue_token`].
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidToken` for bad signatures, malformed
    /// tokens, or expired sessions.
    ///
    /// [`issue_token`]: CredentialService::issue_token
    pub fn verify_token(&self, token: &str) -> Result<SessionClaims, CredentialError> {
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| CredentialError::InvalidToken(e.to_string()))
    }
}
