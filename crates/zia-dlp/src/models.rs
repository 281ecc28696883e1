//! DLP models.

use serde::{Deserialize, Serialize};
use zia_core::ids::{DlpDictionaryId, DlpEngineId};

/// A DLP engine: a boolean expression over dictionaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DlpEngine {
    /// Engine ID (zero before creation).
    #[serde(default)]
    pub id: i64,
    /// Engine name.
    pub name: String,
    /// Name of the predefined engine this one is, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predefined_engine_name: Option<String>,
    /// Expression such as `((D63.S > 1))`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_expression: Option<String>,
    /// User-defined rather than predefined.
    #[serde(default)]
    pub custom_dlp_engine: bool,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DlpEngine {
    /// A custom engine with the given expression.
    #[must_use]
    pub fn custom(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            predefined_engine_name: None,
            engine_expression: Some(expression.into()),
            custom_dlp_engine: true,
            description: None,
        }
    }

    /// Typed ID of this engine.
    #[must_use]
    pub const fn engine_id(&self) -> DlpEngineId {
        DlpEngineId::new(self.id)
    }
}

/// A phrase matched by a dictionary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DlpPhrase {
    /// Counting mode, e.g. `PHRASE_COUNT_TYPE_ALL`.
    pub action: String,
    /// Phrase text.
    pub phrase: String,
}

/// A regular expression matched by a dictionary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DlpPattern {
    /// Counting mode, e.g. `PATTERN_COUNT_TYPE_UNIQUE`.
    pub action: String,
    /// Regular expression.
    pub pattern: String,
}

/// A DLP dictionary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DlpDictionary {
    /// Dictionary ID (zero before creation).
    #[serde(default)]
    pub id: i64,
    /// Dictionary name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Minimum confidence, e.g. `CONFIDENCE_LEVEL_HIGH`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<String>,
    /// How phrases combine, e.g. `MATCH_ALL_CUSTOM_PHRASE_PATTERN_DICTIONARY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_phrase_match_type: Option<String>,
    /// Phrases.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phrases: Vec<DlpPhrase>,
    /// Patterns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<DlpPattern>,
    /// Kind of dictionary, e.g. `PATTERNS_AND_PHRASES`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_type: Option<String>,
    /// User-defined rather than predefined.
    #[serde(default)]
    pub custom: bool,
    /// Proximity window for combined matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity: Option<i32>,
}

impl DlpDictionary {
    /// An empty custom dictionary.
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: None,
            confidence_threshold: None,
            custom_phrase_match_type: None,
            phrases: Vec::new(),
            patterns: Vec::new(),
            dictionary_type: None,
            custom: true,
            proximity: None,
        }
    }

    /// Typed ID of this dictionary.
    #[must_use]
    pub const fn dictionary_id(&self) -> DlpDictionaryId {
        DlpDictionaryId::new(self.id)
    }
}
