//! File-backed format registry.
//!
//! Profiles live in one JSON document `{ "profiles": [ ... ] }`. The
//! registry is never empty after initialization: a missing or corrupt
//! backing file causes the built-in profiles to be reseeded and written
//! back. Every mutation rewrites the whole file; concurrent writers must
//! be serialized by the caller.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use remit_ingest::SampleTable;
use remit_model::FormatProfile;

use crate::matcher::{COLUMN_SCORE_FLOOR, match_column};

/// Persisted registry document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    profiles: Vec<FormatProfile>,
}

/// Collection of known format profiles, mirrored to a JSON file.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    path: PathBuf,
    profiles: BTreeMap<String, FormatProfile>,
}

impl FormatRegistry {
    /// Opens the registry at `path`, seeding built-in profiles when the
    /// file is absent, unreadable, or holds no profiles.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut registry = Self {
            path,
            profiles: BTreeMap::new(),
        };
        registry.load_or_seed()?;
        Ok(registry)
    }

    fn load_or_seed(&mut self) -> Result<()> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str::<RegistryFile>(&contents) {
                Ok(file) if !file.profiles.is_empty() => {
                    for profile in file.profiles {
                        self.profiles.insert(profile.name.clone(), profile);
                    }
                    return Ok(());
                }
                Ok(_) => {
                    warn!(path = %self.path.display(), "format registry is empty, reseeding defaults");
                }
                Err(error) => {
                    warn!(path = %self.path.display(), %error, "format registry is corrupt, reseeding defaults");
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "format registry not found, seeding defaults");
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("read format registry: {}", self.path.display()));
            }
        }
        for profile in builtin_profiles() {
            self.profiles.insert(profile.name.clone(), profile);
        }
        self.save()
    }

    /// Path of the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Looks up a profile by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FormatProfile> {
        self.profiles.get(name)
    }

    /// Iterates over all registered profiles in name order.
    pub fn profiles(&self) -> impl Iterator<Item = &FormatProfile> {
        self.profiles.values()
    }

    /// Registered profile names in order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Adds or replaces a profile and rewrites the backing file.
    pub fn add_profile(&mut self, profile: FormatProfile) -> Result<()> {
        info!(profile = %profile.name, "adding format profile");
        self.profiles.insert(profile.name.clone(), profile);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let file = RegistryFile {
            profiles: self.profiles.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file).context("serialize format registry")?;
        fs::write(&self.path, json)
            .with_context(|| format!("write format registry: {}", self.path.display()))
    }
}

/// Builds a new profile from a sampled file.
///
/// Headers that match the shared canonical pattern dictionary become
/// exact `column_mappings`, so later detections of the same layout score
/// them at full confidence. The first sampled data row is kept as
/// `sample_values` for review.
#[must_use]
pub fn learn_profile(name: &str, description: &str, sample: &SampleTable) -> FormatProfile {
    let mut profile = FormatProfile::new(name, description);
    profile.header_patterns = default_header_patterns();

    for header in &sample.headers {
        if header.is_empty() {
            continue;
        }
        if let Some((canonical, score)) = match_column(&profile, header)
            && score > COLUMN_SCORE_FLOOR
        {
            profile.column_mappings.insert(header.clone(), canonical);
        }
    }
    if let Some(first_row) = sample.rows.first() {
        for (header, value) in sample.headers.iter().zip(first_row) {
            if !header.is_empty() && !value.is_empty() {
                profile
                    .sample_values
                    .insert(header.clone(), vec![value.clone()]);
            }
        }
    }
    profile
        .metadata
        .insert("learned".to_string(), serde_json::json!(true));
    profile
}

/// Canonical pattern dictionary shared by learning and the built-ins.
#[must_use]
pub fn default_header_patterns() -> BTreeMap<String, Vec<String>> {
    let entries: [(&str, &[&str]); 16] = [
        ("transaction_id", &["trans.*(#|id|num)", "payment.*id", "row.?id", "^ref(erence)?\\b"]),
        ("transaction_date", &["trans.*date", "payment.*date", "check.*date", "settle.*date", "post.*date", "^date$"]),
        ("patient_id", &["patient.*(id|#|num)", "client.*(name|id)", "member.*(name|id)", "account.*#"]),
        ("provider_id", &["provider.*(id|#|num)", "\\bnpi\\b"]),
        ("provider_name", &["provider", "rendering", "physician", "clinician"]),
        ("cash_applied", &["cash.*applied", "gross.*am(oun)?t", "amount.*paid", "payment.*am(oun)?t"]),
        ("insurance_payment", &["check.*am(oun)?t", "insurance.*(payment|amt)", "carrier.*paid"]),
        ("patient_payment", &["patient.*(payment|resp)", "copay"]),
        ("adjustment_amount", &["adjust", "write.?off", "contractual"]),
        ("payer_name", &["payer", "payor", "carrier", "insurance.*(co|company)"]),
        ("payment_type", &["payment.*(type|method)", "card.*type"]),
        ("claim_number", &["claim"]),
        ("cpt_code", &["cpt", "procedure.*code"]),
        ("diagnosis_code", &["diag", "icd"]),
        ("service_date", &["service.*date", "\\bdos\\b", "date.*of.*service"]),
        ("notes", &["note", "memo", "comment", "remark"]),
    ];
    entries
        .into_iter()
        .map(|(canonical, patterns)| {
            (
                canonical.to_string(),
                patterns.iter().map(|p| (*p).to_string()).collect(),
            )
        })
        .collect()
}

/// Profiles seeded when the registry file is missing or unusable.
#[must_use]
pub fn builtin_profiles() -> Vec<FormatProfile> {
    vec![credit_card_profile(), insurance_claims_profile()]
}

fn credit_card_profile() -> FormatProfile {
    let mut profile = FormatProfile::new(
        "credit_card_payment",
        "Credit card settlement export from the card processor",
    );
    for (header, canonical) in [
        ("Trans. #", "transaction_id"),
        ("Trans. Date", "transaction_date"),
        ("Gross Amt", "cash_applied"),
        ("Client Name", "patient_id"),
        ("Provider", "provider_name"),
    ] {
        profile.set_mapping(header, canonical);
    }
    profile.set_patterns("transaction_id", ["trans.*(#|id|num)", "payment.*id"]);
    profile.set_patterns(
        "transaction_date",
        ["trans.*date", "settle.*date", "payment.*date"],
    );
    profile.set_patterns("patient_id", ["client.*(name|id)", "member.*(name|id)"]);
    profile.set_patterns("provider_name", ["provider", "rendering"]);
    profile.set_patterns(
        "cash_applied",
        ["gross.*am(oun)?t", "charge.*am(oun)?t", "amount"],
    );
    profile.set_patterns("adjustment_amount", ["\\bfee\\b", "discount"]);
    profile.set_patterns("payment_type", ["card.*type", "payment.*(type|method)"]);
    profile.set_patterns("notes", ["memo", "note", "description"]);
    profile
        .data_types
        .insert("Trans. Date".to_string(), "date".to_string());
    profile
        .data_types
        .insert("Gross Amt".to_string(), "number".to_string());
    profile
}

fn insurance_claims_profile() -> FormatProfile {
    let mut profile = FormatProfile::new(
        "insurance_claims",
        "Insurance claim payment export with continuation rows",
    );
    for (header, canonical) in [
        ("RowId", "transaction_id"),
        ("Check Date", "transaction_date"),
        ("Patient", "patient_id"),
        ("Provider", "provider_name"),
        ("Check Amount", "insurance_payment"),
        ("Cash Applied", "cash_applied"),
        ("Claim #", "claim_number"),
        ("Payer", "payer_name"),
        ("CPT", "cpt_code"),
        ("Diagnosis", "diagnosis_code"),
        ("Service Date", "service_date"),
    ] {
        profile.set_mapping(header, canonical);
    }
    profile.set_patterns("transaction_id", ["row.?id", "transaction.*(id|#)"]);
    profile.set_patterns(
        "transaction_date",
        ["check.*date", "payment.*date", "deposit.*date"],
    );
    profile.set_patterns("patient_id", ["patient.*(id|name|#)", "member.*id", "subscriber"]);
    profile.set_patterns("provider_name", ["provider", "rendering", "physician"]);
    profile.set_patterns(
        "cash_applied",
        ["cash.*applied", "applied.*am(oun)?t", "paid.*am(oun)?t"],
    );
    profile.set_patterns(
        "insurance_payment",
        ["check.*am(oun)?t", "insurance.*(payment|amt)", "carrier.*paid"],
    );
    profile.set_patterns("patient_payment", ["patient.*(payment|resp)", "copay"]);
    profile.set_patterns("adjustment_amount", ["adjust", "write.?off", "contractual"]);
    profile.set_patterns("payer_name", ["payer", "payor", "carrier"]);
    profile.set_patterns("claim_number", ["claim"]);
    profile.set_patterns("cpt_code", ["cpt", "procedure.*code"]);
    profile.set_patterns("diagnosis_code", ["diag", "icd"]);
    profile.set_patterns("service_date", ["service.*date", "\\bdos\\b"]);
    profile.set_patterns("notes", ["note", "memo", "remark"]);
    profile
        .data_types
        .insert("Check Date".to_string(), "date".to_string());
    profile
        .data_types
        .insert("Check Amount".to_string(), "number".to_string());
    profile
        .data_types
        .insert("Cash Applied".to_string(), "number".to_string());
    profile
}
