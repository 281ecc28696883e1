//! Strongly-typed numeric identifiers for ZIA resources.
//!
//! ZIA addresses every resource by a 64-bit integer. Wrapping each kind in
//! its own type keeps a department ID from being passed where a rule ID is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Macro to generate strongly-typed ID wrapper types.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw identifier.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }

            /// Parses an identifier from a string.
            ///
            /// # Errors
            ///
            /// Returns an error if the string is not a decimal integer.
            pub fn parse_str(input: &str) -> Result<Self> {
                input.trim().parse::<i64>().map(Self).map_err(|_| {
                    Error::InvalidRequest(format!(
                        "invalid {}: `{input}`",
                        stringify!($name)
                    ))
                })
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(wrapper: $name) -> Self {
                wrapper.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(RuleId, "Firewall filtering rule ID");
id_type!(DepartmentId, "Department ID");
id_type!(GroupId, "User group ID");
id_type!(UserId, "User ID");
id_type!(DlpEngineId, "DLP engine ID");
id_type!(DlpDictionaryId, "DLP dictionary ID");
