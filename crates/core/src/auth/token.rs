//! HS256 session tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::models::User;
use crate::types::UserId;

/// Token lifetime used when none is configured.
pub const DEFAULT_TTL_HOURS: i64 = 24;
/// Longest token lifetime accepted, one year.
pub const MAX_TTL_HOURS: i64 = 24 * 366;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Why a token was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// `ttl_hours` is clamped to 1..=[`MAX_TTL_HOURS`].
    #[must_use]
    pub fn new(secret: &SecretString, ttl_hours: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 5;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            validation,
            ttl: Duration::hours(ttl_hours.clamp(1, MAX_TTL_HOURS)),
        }
    }

    /// Issue a token for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails or the expiry is
    /// out of range.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_string()))?;
        let claims = Claims {
            id: user.id.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate signature and expiry and return the claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] for expired tokens and
    /// [`TokenError::Invalid`] for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
