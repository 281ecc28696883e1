//! # zia-core
//!
//! Shared client runtime for the ZIA cloud security API.
//!
//! Every resource crate in this workspace (firewall, user management, DLP, ...)
//! is a thin typed layer over the pieces in this crate.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and HTTP status classification
//! - [`token`] - Bearer token freshness evaluation
//! - [`auth`] - Credential sources and the cached token slot
//! - [`transport`] - The request/response seam and its `reqwest` implementation
//! - [`client`] - The typed request dispatcher and HTTP client settings
//! - [`pagination`] - Aggregation of `page`/`pageSize` list endpoints
//! - [`retry`] - Bounded retry of mutating calls on edit-lock conflicts
//! - [`query`] - Query parameter flattening
//! - [`config`] - Serializable, validated client configuration
//! - [`ids`] - Strongly-typed resource identifiers
//! - [`types`] - Value types shared by resource crates

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod ids;
pub mod pagination;
pub mod query;
pub mod retry;
pub mod token;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use client::{ClientConfig, ServiceClient, ServiceClientBuilder};
pub use config::{ConflictRetryConfig, ZiaClientConfig};
pub use error::{Error, Result};
pub use query::QueryParams;
pub use retry::{retry_on_conflict, ConflictRetryPolicy};
pub use token::is_expired;
pub use types::IdNameExtension;
