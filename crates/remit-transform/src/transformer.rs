//! The report transformer: detection, pipeline execution, conformance,
//! validation.
//!
//! `transform` never raises. Every call returns a frame (possibly empty)
//! plus a report carrying the audit trace, validation findings, and the
//! structured error when no table could be produced.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{debug, info};

use remit_detect::ReportFormatDetector;
use remit_ingest::{read_frame, sniff_path};
use remit_model::{FormatDetection, RuleTrace, TransformError, TransformReport};

use crate::conform::conform_to_canonical;
use crate::pipelines::default_pipelines;
use crate::rules::TransformRule;
use crate::validate::validate_table;

/// Frame plus report, the result of every transform call.
#[derive(Debug)]
pub struct TransformOutcome {
    pub frame: DataFrame,
    pub report: TransformReport,
}

impl TransformOutcome {
    fn failed(
        table_name: &str,
        error: TransformError,
        detection: Option<FormatDetection>,
    ) -> Self {
        let mut report = TransformReport::failed(table_name, error);
        report.detection = detection;
        Self {
            frame: DataFrame::empty(),
            report,
        }
    }
}

/// Runs per-format pipelines and conforms results to the canonical schema.
///
/// The detector (and through it the registry) is an explicit dependency:
/// construct one transformer per batch and drop it when done.
pub struct ReportTransformer {
    detector: ReportFormatDetector,
    pipelines: BTreeMap<String, Vec<TransformRule>>,
}

impl ReportTransformer {
    /// A transformer with no registered pipelines.
    #[must_use]
    pub fn new(detector: ReportFormatDetector) -> Self {
        Self {
            detector,
            pipelines: BTreeMap::new(),
        }
    }

    /// A transformer pre-loaded with the built-in format pipelines.
    #[must_use]
    pub fn with_default_pipelines(detector: ReportFormatDetector) -> Self {
        Self {
            detector,
            pipelines: default_pipelines(),
        }
    }

    /// Registers (or replaces) the pipeline for a format.
    pub fn register_pipeline(&mut self, format: impl Into<String>, rules: Vec<TransformRule>) {
        self.pipelines.insert(format.into(), rules);
    }

    /// The pipeline registered for a format, if any.
    #[must_use]
    pub fn pipeline(&self, format: &str) -> Option<&[TransformRule]> {
        self.pipelines.get(format).map(Vec::as_slice)
    }

    #[must_use]
    pub fn detector(&self) -> &ReportFormatDetector {
        &self.detector
    }

    /// Transforms a file, auto-detecting its format.
    #[must_use]
    pub fn transform(&self, path: &Path) -> TransformOutcome {
        self.run(path, None)
    }

    /// Transforms a file using a caller-supplied format name.
    #[must_use]
    pub fn transform_as(&self, path: &Path, format_name: &str) -> TransformOutcome {
        self.run(path, Some(format_name))
    }

    fn run(&self, path: &Path, requested_format: Option<&str>) -> TransformOutcome {
        let table_name = table_name(path);

        let (format_name, detection) = match requested_format {
            Some(name) => (name.to_string(), None),
            None => {
                let detection = self.detector.detect(path);
                match detection.format_name.clone() {
                    Some(name) => (name, Some(detection)),
                    None => {
                        let error = TransformError::UnrecognizedFormat {
                            reason: detection.failure_reason(),
                        };
                        return TransformOutcome::failed(&table_name, error, Some(detection));
                    }
                }
            }
        };

        let Some(rules) = self.pipelines.get(&format_name) else {
            let error = TransformError::PipelineMissing {
                format: format_name,
            };
            return TransformOutcome::failed(&table_name, error, detection);
        };

        match self.execute(path, rules) {
            Ok((frame, trace)) => {
                let issues = validate_table(&table_name, &frame);
                let success = issues.is_empty();
                info!(
                    table = %table_name,
                    format = %format_name,
                    rows = frame.height(),
                    issues = issues.len(),
                    "report transformed"
                );
                TransformOutcome {
                    frame,
                    report: TransformReport {
                        table_name,
                        format_name: Some(format_name),
                        detection,
                        trace,
                        issues,
                        error: None,
                        success,
                    },
                }
            }
            Err(error) => {
                let error = TransformError::Execution {
                    message: format!("{error:#}"),
                };
                TransformOutcome::failed(&table_name, error, detection)
            }
        }
    }

    /// Loads the file and threads it through the pipeline rules in order,
    /// recording before/after counts for audit.
    fn execute(
        &self,
        path: &Path,
        rules: &[TransformRule],
    ) -> Result<(DataFrame, Vec<RuleTrace>)> {
        let dialect = sniff_path(path)?;
        let mut frame = read_frame(path, dialect)?;
        let mut trace = Vec::with_capacity(rules.len());

        for rule in rules {
            let (rows_before, columns_before) = (frame.height(), frame.width());
            frame = rule
                .apply(&frame)
                .with_context(|| format!("apply rule '{}'", rule.name()))?;
            let entry = RuleTrace {
                rule: rule.name().to_string(),
                rows_before,
                columns_before,
                rows_after: frame.height(),
                columns_after: frame.width(),
            };
            debug!(
                rule = %entry.rule,
                rows = entry.rows_after,
                columns = entry.columns_after,
                "pipeline rule applied"
            );
            trace.push(entry);
        }

        let frame = conform_to_canonical(&frame).context("conform to canonical schema")?;
        Ok((frame, trace))
    }
}

fn table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("report")
        .to_string()
}
