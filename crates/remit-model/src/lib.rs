//! Data model for payer billing report normalization.
//!
//! Type definitions only: the canonical transaction schema, format
//! profiles, detection results, and transform reports. Behavior lives in
//! the sibling crates (`remit-detect`, `remit-transform`).

pub mod canonical;
pub mod detection;
pub mod error;
pub mod profile;
pub mod report;

pub use canonical::{
    AMOUNT_COLUMNS, CANONICAL_COLUMNS, DATE_COLUMNS, REQUIRED_VALUE_COLUMNS, is_amount_column,
    is_canonical_column, is_date_column,
};
pub use detection::FormatDetection;
pub use error::TransformError;
pub use profile::FormatProfile;
pub use report::{IssueKind, RuleTrace, TransformReport, ValidationIssue};
