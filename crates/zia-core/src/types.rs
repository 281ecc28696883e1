//! Value types shared by every resource crate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A reference to another resource, as embedded in rules, users and so on.
///
/// Requests only need `id`; responses usually carry `name` as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdNameExtension {
    /// Referenced resource ID
    pub id: i64,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form attributes attached by the upstream
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extensions: HashMap<String, String>,
}

impl IdNameExtension {
    /// Reference by ID only.
    #[must_use]
    pub fn new(id: impl Into<i64>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
