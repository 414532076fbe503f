//! # Lexiq Client
//!
//! HTTP access layer for the Lexiq document-search service.
//!
//! This crate contains:
//! - [`Transport`]: the request pipeline (conditional compression, outcome
//!   classification, typed errors)
//! - [`Client`]: the resource facade (indexes, documents, tasks, dumps,
//!   tenant tokens)
//!
//! ## Architecture
//! - Wire types and the error taxonomy come from `lexiq-domain`
//! - Compression, polling and token signing come from `lexiq-common`
//! - This crate contains all "impure" code (the HTTP exchange)
//!
//! Mutating calls return a [`TaskHandle`]; completion is observed by polling
//! (`Client::wait_for_task`), never inferred.

pub mod client;
mod conversions;
pub mod transport;

// Re-export commonly used items
pub use client::{Client, ClientBuilder, ClientConfig, Health};
pub use lexiq_common::auth::SearchRules;
pub use lexiq_common::compression::{CompressionAlgorithm, CompressionOptions};
pub use lexiq_common::polling::StatusPoller;
pub use lexiq_domain::{
    ApiErrorDetails, DumpInfo, DumpState, LexiqError, Task, TaskHandle, TaskKind, TaskStatus,
};
pub use transport::Transport;
