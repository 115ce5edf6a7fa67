use remit_detect::{FormatRegistry, learn_profile};
use remit_ingest::SampleTable;
use remit_model::FormatProfile;

fn registry_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join("formats.json")
}

#[test]
fn missing_file_seeds_builtin_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let path = registry_path(&dir);

    let registry = FormatRegistry::open(&path).unwrap();
    assert_eq!(
        registry.names(),
        vec!["credit_card_payment".to_string(), "insurance_claims".to_string()]
    );
    assert!(path.exists(), "seeding must write the backing file");
}

#[test]
fn corrupt_file_is_reseeded() {
    let dir = tempfile::tempdir().unwrap();
    let path = registry_path(&dir);
    std::fs::write(&path, "{ not json").unwrap();

    let registry = FormatRegistry::open(&path).unwrap();
    assert_eq!(registry.len(), 2);
    assert!(!registry.is_empty());

    // the rewrite must have replaced the corrupt contents
    let contents = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["profiles"].as_array().unwrap().len(), 2);
}

#[test]
fn add_profile_rewrites_backing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = registry_path(&dir);

    let mut registry = FormatRegistry::open(&path).unwrap();
    let mut profile = FormatProfile::new("patient_statements", "Patient statement export");
    profile.set_mapping("Stmt Date", "transaction_date");
    registry.add_profile(profile).unwrap();

    let reloaded = FormatRegistry::open(&path).unwrap();
    assert_eq!(reloaded.len(), 3);
    let stored = reloaded.get("patient_statements").unwrap();
    assert_eq!(
        stored.column_mappings.get("Stmt Date"),
        Some(&"transaction_date".to_string())
    );
}

#[test]
fn profiles_survive_save_and_load_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = registry_path(&dir);

    let registry = FormatRegistry::open(&path).unwrap();
    let original = registry.get("insurance_claims").unwrap().clone();

    let reloaded = FormatRegistry::open(&path).unwrap();
    assert_eq!(reloaded.get("insurance_claims"), Some(&original));
}

#[test]
fn learned_profile_maps_recognizable_headers() {
    let sample = SampleTable {
        headers: vec![
            "Payment Date".to_string(),
            "Provider".to_string(),
            "Cash Applied".to_string(),
            "Batch Ref".to_string(),
        ],
        rows: vec![vec![
            "01/05/2025".to_string(),
            "Tammy Maxey".to_string(),
            "55.00".to_string(),
            "B-1".to_string(),
        ]],
    };

    let profile = learn_profile("cash_log", "Front desk cash log", &sample);
    assert_eq!(
        profile.column_mappings.get("Payment Date"),
        Some(&"transaction_date".to_string())
    );
    assert_eq!(
        profile.column_mappings.get("Provider"),
        Some(&"provider_name".to_string())
    );
    assert_eq!(
        profile.column_mappings.get("Cash Applied"),
        Some(&"cash_applied".to_string())
    );
    assert!(!profile.column_mappings.contains_key("Batch Ref"));
    assert_eq!(
        profile.sample_values.get("Provider"),
        Some(&vec!["Tammy Maxey".to_string()])
    );
}
