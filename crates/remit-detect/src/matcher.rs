//! Header-to-canonical column matching for one profile.
//!
//! Matching runs in strict priority order with no score blending: exact
//! mapping, then regex patterns, then a string-similarity fallback. The
//! first strategy that hits decides the result.

use rapidfuzz::distance::indel;
use regex::RegexBuilder;
use tracing::warn;

use remit_model::FormatProfile;

/// Score for a header found verbatim in `column_mappings`.
pub const EXACT_MATCH_SCORE: f64 = 1.0;
/// Score for a header matched by a profile regex pattern.
pub const PATTERN_MATCH_SCORE: f64 = 0.9;
/// Minimum similarity ratio for the fallback to accept a match.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;
/// Matches at or below this score are dropped from profile scoring.
pub const COLUMN_SCORE_FLOOR: f64 = 0.5;

/// Maps one source header to a canonical column with a confidence score.
///
/// Returns `None` when no strategy clears its acceptance threshold.
#[must_use]
pub fn match_column(profile: &FormatProfile, header: &str) -> Option<(String, f64)> {
    let header = header.trim();
    if header.is_empty() {
        return None;
    }

    if let Some(canonical) = profile.column_mappings.get(header) {
        return Some((canonical.clone(), EXACT_MATCH_SCORE));
    }

    for (canonical, patterns) in &profile.header_patterns {
        for pattern in patterns {
            if pattern_matches(pattern, header) {
                return Some((canonical.clone(), PATTERN_MATCH_SCORE));
            }
        }
    }

    // The fallback compares against the pattern table's keys, so a profile
    // without header_patterns can never match by similarity.
    let lowered = header.to_lowercase();
    let mut best: Option<(String, f64)> = None;
    for canonical in profile.header_patterns.keys() {
        let score = similarity(&lowered, canonical);
        if best.as_ref().is_none_or(|(_, current)| score > *current) {
            best = Some((canonical.clone(), score));
        }
    }
    best.filter(|(_, score)| *score > SIMILARITY_THRESHOLD)
}

fn pattern_matches(pattern: &str, header: &str) -> bool {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(regex) => regex.is_match(header),
        Err(error) => {
            warn!(pattern = %pattern, %error, "skipping invalid header pattern");
            false
        }
    }
}

/// Normalized sequence-similarity ratio in 0.0-1.0.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> FormatProfile {
        let mut profile = FormatProfile::new("test", "test profile");
        profile.set_mapping("Trans. #", "transaction_id");
        profile.set_patterns("transaction_date", ["trans.*date", "settle.*date"]);
        profile.set_patterns("provider_name", ["provider"]);
        profile
    }

    #[test]
    fn exact_mapping_wins_with_full_confidence() {
        let (canonical, score) = match_column(&profile(), "Trans. #").expect("match");
        assert_eq!(canonical, "transaction_id");
        assert_eq!(score, EXACT_MATCH_SCORE);
    }

    #[test]
    fn pattern_match_is_case_insensitive() {
        let (canonical, score) = match_column(&profile(), "SETTLE DATE").expect("match");
        assert_eq!(canonical, "transaction_date");
        assert_eq!(score, PATTERN_MATCH_SCORE);
    }

    #[test]
    fn similarity_fallback_accepts_close_names() {
        let (canonical, score) = match_column(&profile(), "provder name").expect("match");
        assert_eq!(canonical, "provider_name");
        assert!(score > SIMILARITY_THRESHOLD && score < PATTERN_MATCH_SCORE);
    }

    #[test]
    fn unrelated_header_does_not_match() {
        assert_eq!(match_column(&profile(), "Batch Ref"), None);
    }

    #[test]
    fn profile_without_patterns_never_matches_by_similarity() {
        let mut bare = FormatProfile::new("bare", "mappings only");
        bare.set_mapping("Exact", "notes");
        assert_eq!(match_column(&bare, "notes"), None);
        assert!(match_column(&bare, "Exact").is_some());
    }

    #[test]
    fn identical_strings_have_unit_similarity() {
        assert_eq!(similarity("cash_applied", "cash_applied"), 1.0);
        assert!(similarity("cash_applied", "zzz") < 0.3);
    }
}
