//! Scoped tenant tokens.
//!
//! A tenant token is a compact signed credential a backend mints for an
//! untrusted downstream caller (typically a browser) so that caller can
//! search with restricted visibility. The token embeds the search rules and
//! the uid of the API key it derives from; the service verifies the HMAC
//! signature with that key, so the signer here never talks to the network.

pub mod tenant_token;
pub mod types;

pub use tenant_token::{generate_tenant_token, TenantTokenError};
pub use types::{SearchRules, TenantTokenClaims};
