//! Format detection result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Result of scoring a file against the registered format profiles.
///
/// `format_name` is `None` when the file was not recognized: no header
/// row, no profile above the confidence threshold, or a read failure.
/// The metadata map explains which, so callers can decide the next step
/// without this type ever being an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatDetection {
    /// Winning format name, or `None` if unrecognized.
    pub format_name: Option<String>,
    /// Overall match confidence, 0.0-1.0.
    pub confidence: f64,
    /// Source header -> canonical column, for the winning profile.
    pub column_map: BTreeMap<String, String>,
    /// Source header -> per-column match confidence.
    pub confidence_scores: BTreeMap<String, f64>,
    /// Diagnostics: candidate scores, error text, no-header flag.
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl FormatDetection {
    /// A zero-confidence result carrying an error explanation.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("error".to_string(), serde_json::json!(message.into()));
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// A zero-confidence result for a file with no detectable header row.
    #[must_use]
    pub fn no_header() -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("no_header".to_string(), serde_json::json!(true));
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// True when a format was identified above the acceptance threshold.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        self.format_name.is_some()
    }

    /// Short reason string for diagnostics when unrecognized.
    #[must_use]
    pub fn failure_reason(&self) -> String {
        if self.metadata.contains_key("no_header") {
            return "no header row detected".to_string();
        }
        if let Some(serde_json::Value::String(text)) = self.metadata.get("error") {
            return text.clone();
        }
        format!("best candidate below threshold (confidence {:.2})", self.confidence)
    }
}
