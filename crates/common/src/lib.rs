//! Shared utilities for the Lexiq client SDK.
//!
//! Everything in this crate is network-free: the compression codec and the
//! tenant token signer are pure computation, and the status poller only
//! drives a fetch primitive injected by the caller. The HTTP layer lives in
//! `lexiq-client`.
//!
//! - [`compression`]: conditional payload compression for outbound requests
//! - [`polling`]: generic bounded wait for asynchronous task completion
//! - [`auth`]: scoped tenant token construction and signing

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod compression;
pub mod polling;

// Re-export commonly used types and traits for convenience
pub use auth::{generate_tenant_token, SearchRules, TenantTokenClaims, TenantTokenError};
pub use compression::{
    CompressionAlgorithm, CompressionCodec, CompressionError, CompressionOptions,
};
pub use polling::{PollError, Progress, StatusPoller};
