//! Data loss prevention client for the ZIA API.
//!
//! Covers DLP engines (`/dlpEngines`) and DLP dictionaries
//! (`/dlpDictionaries`).

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{DlpClient, DlpClientBuilder};
pub use models::{DlpDictionary, DlpEngine, DlpPattern, DlpPhrase};

/// Convenient result alias that reuses the shared ZIA error type.
pub type Result<T> = zia_core::Result<T>;
