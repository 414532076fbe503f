//! Conversions from utility-layer errors into the public error taxonomy.
//!
//! `lexiq-common` knows nothing about `lexiq-domain`, so its module-local
//! error enums are mapped here, at the client boundary, into `LexiqError`.

use lexiq_common::auth::TenantTokenError;
use lexiq_common::compression::CompressionError;
use lexiq_common::polling::PollError;
use lexiq_domain::LexiqError;

pub(crate) fn compression_error(err: CompressionError) -> LexiqError {
    match err {
        CompressionError::Unsupported(algorithm) => {
            LexiqError::UnsupportedAlgorithm { algorithm: algorithm.to_string() }
        }
        CompressionError::Encode(err) | CompressionError::Decode(err) => {
            LexiqError::Compression(err.to_string())
        }
    }
}

pub(crate) fn tenant_token_error(err: TenantTokenError) -> LexiqError {
    match err {
        TenantTokenError::InvalidApiKeyUid => LexiqError::TenantInvalidApiKeyUid,
        TenantTokenError::InvalidApiKey => LexiqError::TenantInvalidApiKey,
        TenantTokenError::Expired => LexiqError::TenantTokenExpired,
        TenantTokenError::Signing(message) => LexiqError::TenantTokenSigning(message),
    }
}

pub(crate) fn poll_error(err: PollError<LexiqError>) -> LexiqError {
    match err {
        PollError::Fetch(err) => err,
        PollError::TimedOut { id, timeout } => {
            LexiqError::TaskTimeout { id, timeout_ms: timeout.as_millis() as u64 }
        }
        PollError::Cancelled { id } => LexiqError::WaitCancelled { id },
    }
}
