//! Report format detection: profile matching, the file-backed format
//! registry, and confidence-scored detection over sampled CSV files.

pub mod detector;
pub mod matcher;
pub mod registry;

pub use detector::{DEFAULT_SAMPLE_ROWS, FORMAT_CONFIDENCE_THRESHOLD, ReportFormatDetector};
pub use matcher::{
    COLUMN_SCORE_FLOOR, EXACT_MATCH_SCORE, PATTERN_MATCH_SCORE, SIMILARITY_THRESHOLD,
    match_column, similarity,
};
pub use registry::{FormatRegistry, builtin_profiles, default_header_patterns, learn_profile};
