//! Format profile types.
//!
//! A [`FormatProfile`] describes one recognizable report layout: exact
//! header-to-canonical mappings plus regex patterns per canonical column.
//! Profiles are persisted in the format registry as JSON and must
//! round-trip losslessly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named descriptor of one known report layout.
///
/// `column_mappings` always wins over pattern or similarity matching:
/// an exact header hit maps with confidence 1.0 before any other
/// strategy is consulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatProfile {
    /// Unique profile name (registry key), e.g. `credit_card_payment`.
    pub name: String,
    /// Human-readable description of the source report.
    pub description: String,
    /// Canonical column -> ordered list of case-insensitive regex patterns.
    #[serde(default)]
    pub header_patterns: BTreeMap<String, Vec<String>>,
    /// Exact source header -> canonical column.
    #[serde(default)]
    pub column_mappings: BTreeMap<String, String>,
    /// Stringified sample values per source header, captured when learning.
    #[serde(default)]
    pub sample_values: BTreeMap<String, Vec<String>>,
    /// Declared source data types per header, when known.
    #[serde(default)]
    pub data_types: BTreeMap<String, String>,
    /// Free-form profile metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl FormatProfile {
    /// Creates an empty profile with a name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Adds or replaces one exact header mapping.
    pub fn set_mapping(&mut self, header: impl Into<String>, canonical: impl Into<String>) {
        self.column_mappings.insert(header.into(), canonical.into());
    }

    /// Adds pattern alternatives for a canonical column, preserving order.
    pub fn set_patterns<I, S>(&mut self, canonical: impl Into<String>, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_patterns.insert(
            canonical.into(),
            patterns.into_iter().map(Into::into).collect(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_round_trips_through_json() {
        let mut profile = FormatProfile::new("credit_card_payment", "Card settlement export");
        profile.set_mapping("Trans. #", "transaction_id");
        profile.set_patterns("transaction_date", ["trans.*date", "payment.*date"]);
        profile
            .sample_values
            .insert("Trans. #".to_string(), vec!["9690".to_string()]);
        profile
            .data_types
            .insert("Trans. #".to_string(), "string".to_string());
        profile
            .metadata
            .insert("source".to_string(), serde_json::json!("builtin"));

        let json = serde_json::to_string(&profile).expect("serialize profile");
        let round: FormatProfile = serde_json::from_str(&json).expect("deserialize profile");
        assert_eq!(round, profile);
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let round: FormatProfile =
            serde_json::from_str(r#"{"name":"x","description":"y"}"#).expect("parse");
        assert!(round.header_patterns.is_empty());
        assert!(round.column_mappings.is_empty());
    }
}
