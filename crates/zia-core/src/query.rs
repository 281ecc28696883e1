//! Query parameter flattening.
//!
//! Values are omitted when absent or empty, and multi-valued keys are repeated
//! once per value (`?dept=1&dept=2`), which is how every list endpoint expects
//! filters to arrive.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair unless the value renders empty.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        let value = value.to_string();
        if !value.is_empty() {
            self.pairs.push((key, value));
        }
    }

    /// Append a key/value pair when the value is present and non-empty.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Repeat `key` once for every value.
    pub fn push_all<I, T>(&mut self, key: &'static str, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        for value in values {
            self.push(key, value);
        }
    }

    /// Chaining form of [`push`](Self::push).
    #[must_use]
    pub fn with<T>(mut self, key: &'static str, value: T) -> Self
    where
        T: Display,
    {
        self.push(key, value);
        self
    }

    /// Returns true if any pair uses `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| *k == key)
    }

    /// Borrow the collected pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl From<Vec<(&'static str, String)>> for QueryParams {
    fn from(pairs: Vec<(&'static str, String)>) -> Self {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.push(key, value);
        }
        params
    }
}
