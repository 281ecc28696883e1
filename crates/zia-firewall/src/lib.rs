//! Firewall filtering rule client for the ZIA API.
//!
//! Provides typed models and an asynchronous client for the cloud firewall
//! filtering policy (`/firewallFilteringRules`).

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{FirewallClient, FirewallClientBuilder};
pub use models::{FilteringRule, FilteringRuleListParams, RuleAction, RuleState};

/// Convenient result alias that reuses the shared ZIA error type.
pub type Result<T> = zia_core::Result<T>;
