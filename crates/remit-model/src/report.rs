//! Transformation report types.
//!
//! A transform call always produces a report: rule-by-rule audit counts,
//! validation findings, and the structured error when the table could not
//! be produced. Failures are values here, never exceptions, so batch
//! importers can keep going after one bad file.

use serde::{Deserialize, Serialize};

use crate::detection::FormatDetection;
use crate::error::TransformError;

/// Kind of a data-quality finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A required column has null values.
    MissingRequired,
    /// An amount column contains negative values.
    NegativeValues,
    /// A date column contains values that do not parse.
    InvalidDates,
}

impl IssueKind {
    /// Stable snake_case tag, matching the serialized form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequired => "missing_required",
            Self::NegativeValues => "negative_values",
            Self::InvalidDates => "invalid_dates",
        }
    }
}

/// One validation finding over the canonical table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Finding category.
    pub kind: IssueKind,
    /// Canonical column the finding applies to.
    pub column: String,
    /// Human-readable message (includes parse error text for dates).
    pub message: String,
    /// Number of offending rows or values.
    pub count: usize,
}

/// Before/after counts for one executed pipeline rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTrace {
    /// Rule name, e.g. `rename_columns`.
    pub rule: String,
    pub rows_before: usize,
    pub columns_before: usize,
    pub rows_after: usize,
    pub columns_after: usize,
}

/// Metadata accompanying every transform result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformReport {
    /// Table label used in logs, normally the source file stem.
    pub table_name: String,
    /// Format whose pipeline was executed, when one was resolved.
    pub format_name: Option<String>,
    /// Detection result, present when the format was auto-detected.
    pub detection: Option<FormatDetection>,
    /// Per-rule audit log in execution order.
    pub trace: Vec<RuleTrace>,
    /// Validation findings over the canonical table.
    pub issues: Vec<ValidationIssue>,
    /// Structured failure, when no table could be produced.
    pub error: Option<TransformError>,
    /// True when the table was produced and validation found nothing.
    pub success: bool,
}

impl TransformReport {
    /// A failed report with no table.
    #[must_use]
    pub fn failed(table_name: impl Into<String>, error: TransformError) -> Self {
        Self {
            table_name: table_name.into(),
            error: Some(error),
            success: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_kind_serializes_snake_case() {
        let json = serde_json::to_string(&IssueKind::MissingRequired).expect("serialize");
        assert_eq!(json, r#""missing_required""#);
        assert_eq!(IssueKind::NegativeValues.as_str(), "negative_values");
    }

    #[test]
    fn failed_report_is_not_success() {
        let report = TransformReport::failed(
            "upload",
            TransformError::PipelineMissing {
                format: "ad_hoc".to_string(),
            },
        );
        assert!(!report.success);
        assert!(matches!(
            report.error,
            Some(TransformError::PipelineMissing { .. })
        ));
    }
}
