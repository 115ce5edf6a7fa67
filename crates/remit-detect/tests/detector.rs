use std::io::Write;
use std::path::PathBuf;

use remit_detect::{FormatRegistry, ReportFormatDetector};

fn detector(dir: &tempfile::TempDir) -> ReportFormatDetector {
    let registry = FormatRegistry::open(dir.path().join("formats.json")).unwrap();
    ReportFormatDetector::new(registry)
}

fn write_report(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{contents}").unwrap();
    path
}

#[test]
fn credit_card_export_is_recognized() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_report(
        &dir,
        "settlement.csv",
        "Trans. #,Trans. Date,Settle Date,Card Type,Last 4,Gross Amt,Fee,Net Amt,Client Name,Provider\n\
         9690,01-04-2025,01-06-2025,Visa,4242,55,2.10,52.90,Kate Martin,Tammy Maxey\n",
    );

    let detection = detector(&dir).detect(&path);
    assert_eq!(detection.format_name.as_deref(), Some("credit_card_payment"));
    assert!(detection.confidence > 0.7, "confidence {}", detection.confidence);
    assert_eq!(
        detection.column_map.get("Gross Amt"),
        Some(&"cash_applied".to_string())
    );
    assert_eq!(detection.confidence_scores.get("Trans. #"), Some(&1.0));
}

#[test]
fn insurance_export_beats_credit_card_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_report(
        &dir,
        "claims.csv",
        "RowId,Check Date,Patient,Claim #,CPT,Check Amount,Cash Applied,Provider,Service Date\n\
         1,01/02/2025,Ann Ames,CL-100,99213,120.00,120.00,Sara Smith,12/28/2024\n",
    );

    let detection = detector(&dir).detect(&path);
    assert_eq!(detection.format_name.as_deref(), Some("insurance_claims"));
    assert!(detection.confidence > 0.9);
}

#[test]
fn generic_headers_fall_below_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_report(
        &dir,
        "unknown.csv",
        "Column1,Column2,Column3,Column4\nalpha,beta,gamma,1\n",
    );

    let detection = detector(&dir).detect(&path);
    assert_eq!(detection.format_name, None);
    assert!(detection.confidence < 0.5);
    // diagnostics still carry the scored candidates
    let candidates = detection.metadata.get("candidates").unwrap();
    assert_eq!(candidates.as_array().unwrap().len(), 2);
}

#[test]
fn headerless_file_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_report(&dir, "raw.csv", "9690,55.00,2025\n9691,60.00,2025\n");

    let detection = detector(&dir).detect(&path);
    assert_eq!(detection.format_name, None);
    assert_eq!(detection.confidence, 0.0);
    assert_eq!(
        detection.metadata.get("no_header"),
        Some(&serde_json::json!(true))
    );
    assert!(detection.metadata.get("candidates").is_none());
}

#[test]
fn unreadable_file_becomes_zero_confidence_result() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.csv");

    let detection = detector(&dir).detect(&missing);
    assert_eq!(detection.format_name, None);
    assert_eq!(detection.confidence, 0.0);
    assert!(detection.metadata.contains_key("error"));
}

#[test]
fn semicolon_delimited_export_is_still_recognized() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_report(
        &dir,
        "settlement.csv",
        "Trans. #;Trans. Date;Gross Amt;Client Name;Provider\n\
         9690;01-04-2025;55;Kate Martin;Tammy Maxey\n",
    );

    let detection = detector(&dir).detect(&path);
    assert_eq!(detection.format_name.as_deref(), Some("credit_card_payment"));
}
