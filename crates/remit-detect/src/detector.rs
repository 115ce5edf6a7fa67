//! Report format detection.
//!
//! Scores a sampled file against every registered profile and returns the
//! best match with a confidence and column map. Detection never raises:
//! read failures, headerless files, and sub-threshold matches all come
//! back as a [`FormatDetection`] value the caller can inspect.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, warn};

use remit_ingest::{SampleTable, read_sample, sniff_path};
use remit_model::{FormatDetection, FormatProfile};

use crate::matcher::{COLUMN_SCORE_FLOOR, match_column};
use crate::registry::FormatRegistry;

/// Data rows sampled for scoring when the caller does not say otherwise.
pub const DEFAULT_SAMPLE_ROWS: usize = 10;
/// Minimum winning confidence for a format to be reported.
pub const FORMAT_CONFIDENCE_THRESHOLD: f64 = 0.5;
/// Confidence assigned when required canonical columns are missing.
const MISSING_REQUIRED_CONFIDENCE: f64 = 0.2;
/// Candidate scores surfaced in diagnostics for unrecognized files.
const CANDIDATE_METADATA_LIMIT: usize = 3;

/// Canonical columns a profile must cover to score above the clamp. The
/// amount slot is an alias class: either payment amount column counts.
const REQUIRED_DETECTION_COLUMNS: [&str; 2] = ["transaction_date", "provider_name"];
const AMOUNT_CLASS_COLUMNS: [&str; 2] = ["cash_applied", "insurance_payment"];

/// Detects which registered format a report file uses.
#[derive(Debug, Clone)]
pub struct ReportFormatDetector {
    registry: FormatRegistry,
}

/// One profile's score against a sampled file.
#[derive(Debug, Clone)]
struct ProfileScore {
    name: String,
    confidence: f64,
    column_map: BTreeMap<String, String>,
    confidence_scores: BTreeMap<String, f64>,
}

impl ReportFormatDetector {
    /// Creates a detector over an opened registry.
    #[must_use]
    pub fn new(registry: FormatRegistry) -> Self {
        Self { registry }
    }

    /// The registry this detector scores against.
    #[must_use]
    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Detects the format using the default sample size.
    #[must_use]
    pub fn detect(&self, path: &Path) -> FormatDetection {
        self.detect_with_sample(path, DEFAULT_SAMPLE_ROWS)
    }

    /// Detects the format from the first `sample_rows` data rows.
    #[must_use]
    pub fn detect_with_sample(&self, path: &Path, sample_rows: usize) -> FormatDetection {
        match self.try_detect(path, sample_rows) {
            Ok(detection) => detection,
            Err(error) => {
                warn!(path = %path.display(), error = %format!("{error:#}"), "format detection failed");
                FormatDetection::failure(format!("{error:#}"))
            }
        }
    }

    fn try_detect(&self, path: &Path, sample_rows: usize) -> Result<FormatDetection> {
        let dialect = sniff_path(path)?;
        if !dialect.has_header {
            debug!(path = %path.display(), "no header row detected, skipping profile scoring");
            return Ok(FormatDetection::no_header());
        }

        let sample = read_sample(path, dialect, sample_rows)?;
        if sample.headers.is_empty() {
            return Ok(FormatDetection::no_header());
        }

        let mut scores: Vec<ProfileScore> = self
            .registry
            .profiles()
            .map(|profile| score_profile(profile, &sample))
            .collect();
        scores.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let candidates: Vec<serde_json::Value> = scores
            .iter()
            .take(CANDIDATE_METADATA_LIMIT)
            .map(|score| {
                serde_json::json!({
                    "name": score.name,
                    "confidence": score.confidence,
                })
            })
            .collect();

        let Some(best) = scores.into_iter().next() else {
            return Ok(FormatDetection::failure("format registry is empty"));
        };

        let mut metadata = BTreeMap::new();
        metadata.insert("candidates".to_string(), serde_json::Value::Array(candidates));

        if best.confidence < FORMAT_CONFIDENCE_THRESHOLD {
            debug!(
                path = %path.display(),
                best = %best.name,
                confidence = best.confidence,
                "best candidate below threshold"
            );
            return Ok(FormatDetection {
                format_name: None,
                confidence: best.confidence,
                column_map: BTreeMap::new(),
                confidence_scores: BTreeMap::new(),
                metadata,
            });
        }

        debug!(
            path = %path.display(),
            format = %best.name,
            confidence = best.confidence,
            mapped = best.column_map.len(),
            "format detected"
        );
        Ok(FormatDetection {
            format_name: Some(best.name),
            confidence: best.confidence,
            column_map: best.column_map,
            confidence_scores: best.confidence_scores,
            metadata,
        })
    }
}

/// Scores one profile against the sampled headers.
///
/// Matches at or below [`COLUMN_SCORE_FLOOR`] are discarded. A profile
/// missing any required canonical column is clamped to a fixed low
/// confidence no matter how many incidental columns it matched;
/// otherwise confidence blends coverage and mean match quality equally.
fn score_profile(profile: &FormatProfile, sample: &SampleTable) -> ProfileScore {
    let mut column_map = BTreeMap::new();
    let mut confidence_scores = BTreeMap::new();

    let headers: Vec<&String> = sample
        .headers
        .iter()
        .filter(|header| !header.is_empty())
        .collect();
    for header in &headers {
        if let Some((canonical, score)) = match_column(profile, header)
            && score > COLUMN_SCORE_FLOOR
        {
            column_map.insert((*header).clone(), canonical);
            confidence_scores.insert((*header).clone(), score);
        }
    }

    let confidence = if headers.is_empty() || !has_required_columns(&column_map) {
        MISSING_REQUIRED_CONFIDENCE
    } else {
        let mapped_fraction = column_map.len() as f64 / headers.len() as f64;
        let mean_score =
            confidence_scores.values().sum::<f64>() / confidence_scores.len() as f64;
        0.5 * mapped_fraction + 0.5 * mean_score
    };

    ProfileScore {
        name: profile.name.clone(),
        confidence,
        column_map,
        confidence_scores,
    }
}

fn has_required_columns(column_map: &BTreeMap<String, String>) -> bool {
    let mapped: Vec<&str> = column_map.values().map(String::as_str).collect();
    REQUIRED_DETECTION_COLUMNS
        .iter()
        .all(|required| mapped.contains(required))
        && AMOUNT_CLASS_COLUMNS
            .iter()
            .any(|amount| mapped.contains(amount))
}
