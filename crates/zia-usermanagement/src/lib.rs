//! User management client for the ZIA API.
//!
//! Departments and groups are synchronised from the identity provider and are
//! read-only here; users support full CRUD.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{UserManagementClient, UserManagementClientBuilder};
pub use models::{Department, Group, NameSearchParams, User, UserListParams};

/// Convenient result alias that reuses the shared ZIA error type.
pub type Result<T> = zia_core::Result<T>;
