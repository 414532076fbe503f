//! Error types used throughout the SDK

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error payload returned by the Lexiq service.
///
/// Failure responses that carry a body serialize this shape; failure
/// responses without a body are synthesized from the status line via
/// [`ApiErrorDetails::from_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetails {
    /// Human-readable description of the failure
    #[serde(default)]
    pub message: String,

    /// Stable machine-readable error code (e.g. "index_not_found")
    #[serde(default)]
    pub code: String,

    /// Error category (e.g. "invalid_request", "internal")
    #[serde(default, rename = "type")]
    pub error_type: String,

    /// Documentation link for the error code
    #[serde(default)]
    pub link: String,
}

impl ApiErrorDetails {
    /// Build details from a bare status line when the response had no body.
    pub fn from_status(status: u16, reason: &str) -> Self {
        Self {
            message: reason.to_string(),
            code: status.to_string(),
            error_type: String::new(),
            link: String::new(),
        }
    }
}

impl fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.code.is_empty() {
            write!(f, " (code: {})", self.code)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiErrorDetails {}

/// Main error type for the Lexiq SDK
#[derive(Error, Debug)]
pub enum LexiqError {
    /// HTTP failure status from the service, with structured detail when the
    /// response carried one
    #[error("api error: {0}")]
    Api(ApiErrorDetails),

    /// Transport-level failure; no HTTP response was obtained
    #[error("communication error: {0}")]
    Communication(String),

    /// The configured compression algorithm is not available in this build
    #[error("compression algorithm '{algorithm}' is not supported in this build")]
    UnsupportedAlgorithm {
        /// Wire label of the algorithm that was requested
        algorithm: String,
    },

    /// Compressing or decompressing a payload failed
    #[error("compression error: {0}")]
    Compression(String),

    /// Serializing a request body or deserializing a response body failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The polling budget was exhausted before a terminal status was observed.
    /// The task may still complete later on the service side.
    #[error("task '{id}' did not reach a terminal status within {timeout_ms}ms")]
    TaskTimeout {
        /// Identifier of the task or dump that was being awaited
        id: String,
        /// Wait budget that was exhausted, in milliseconds
        timeout_ms: u64,
    },

    /// A cancellation signal fired while waiting on a task
    #[error("wait on '{id}' was cancelled")]
    WaitCancelled {
        /// Identifier of the task or dump that was being awaited
        id: String,
    },

    /// Tenant token: the api key uid was empty
    #[error("tenant token: api key uid must not be empty")]
    TenantInvalidApiKeyUid,

    /// Tenant token: the signing key was too weak
    #[error("tenant token: api key must be at least 8 characters")]
    TenantInvalidApiKey,

    /// Tenant token: the requested expiry is not in the future
    #[error("tenant token: expiry must be in the future")]
    TenantTokenExpired,

    /// Tenant token: the JWT encoder rejected the claims
    #[error("tenant token signing failed: {0}")]
    TenantTokenSigning(String),

    /// Client-side configuration error (bad base URL, missing key, ...)
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for Lexiq operations
pub type Result<T> = std::result::Result<T, LexiqError>;

impl From<serde_json::Error> for LexiqError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
