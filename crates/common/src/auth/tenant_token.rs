//! Tenant token signing.
//!
//! Validation runs before any cryptographic work and each precondition has
//! its own error kind, so callers can distinguish a weak key from a stale
//! expiry without parsing messages. Signing is HMAC-SHA256 over the compact
//! JWT form with the raw API key bytes as the secret.

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use thiserror::Error;

use super::types::{SearchRules, TenantTokenClaims};

/// Minimum length accepted for the HMAC signing secret.
const MIN_API_KEY_LENGTH: usize = 8;

/// Tenant token precondition and signing failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenantTokenError {
    /// The api key uid was empty
    #[error("api key uid must not be empty")]
    InvalidApiKeyUid,

    /// The signing key was empty or shorter than 8 characters
    #[error("api key must be at least 8 characters")]
    InvalidApiKey,

    /// The requested expiry is not strictly in the future
    #[error("expiry must be strictly in the future")]
    Expired,

    /// The JWT encoder rejected the claims
    #[error("jwt encoding failed: {0}")]
    Signing(String),
}

/// Build and sign a tenant token.
///
/// The token is deterministic for identical inputs: the claims carry no
/// issued-at timestamp, only the optional `exp`.
///
/// # Errors
/// Fails fast, in order, on an empty `api_key_uid`, an `api_key` shorter
/// than 8 characters, or an `expires_at` that is not after the current UTC
/// time. No signing work happens once a precondition fails.
pub fn generate_tenant_token(
    api_key_uid: &str,
    search_rules: SearchRules,
    api_key: &str,
    expires_at: Option<DateTime<Utc>>,
) -> Result<String, TenantTokenError> {
    if api_key_uid.is_empty() {
        return Err(TenantTokenError::InvalidApiKeyUid);
    }
    if api_key.len() < MIN_API_KEY_LENGTH {
        return Err(TenantTokenError::InvalidApiKey);
    }
    if let Some(expires_at) = expires_at {
        if expires_at <= Utc::now() {
            return Err(TenantTokenError::Expired);
        }
    }

    let claims = TenantTokenClaims {
        search_rules,
        api_key_uid: api_key_uid.to_string(),
        exp: expires_at.map(|at| at.timestamp()),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(api_key.as_bytes()),
    )
    .map_err(|err| TenantTokenError::Signing(err.to_string()))
}
