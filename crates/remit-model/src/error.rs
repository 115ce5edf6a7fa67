//! Structured transform failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a transform call produced no table.
///
/// The three categories are distinguishable so callers can branch:
/// recognition failures may prompt for a manual format, a missing
/// pipeline is a curation gap, execution failures are file problems.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformError {
    /// Detection could not identify the report format.
    #[error("report format not recognized: {reason}")]
    UnrecognizedFormat { reason: String },
    /// The format is known but has no registered pipeline.
    #[error("no transformation pipeline registered for format '{format}'")]
    PipelineMissing { format: String },
    /// Reading or transforming the file failed.
    #[error("transformation failed: {message}")]
    Execution { message: String },
}
