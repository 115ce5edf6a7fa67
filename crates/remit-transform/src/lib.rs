//! Declarative transformation pipelines over ingested report files.
//!
//! Each format owns an ordered list of [`TransformRule`]s. The
//! [`ReportTransformer`] resolves a format (given or detected), runs its
//! pipeline, conforms the result to the canonical transaction schema,
//! and validates it.

pub mod conform;
pub mod datetime;
pub mod numeric;
pub mod pipelines;
pub mod rules;
pub mod transformer;
pub mod validate;

pub use conform::conform_to_canonical;
pub use datetime::{DATE_OUTPUT_FORMAT, parse_date_auto, parse_date_value};
pub use numeric::parse_amount;
pub use pipelines::default_pipelines;
pub use rules::{RuleError, TransformRule};
pub use transformer::{ReportTransformer, TransformOutcome};
pub use validate::validate_table;
