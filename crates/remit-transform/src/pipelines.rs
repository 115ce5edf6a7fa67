//! Curated pipelines for the built-in report formats.

use std::collections::BTreeMap;

use crate::rules::TransformRule;

/// Pipelines for the formats the registry seeds by default.
#[must_use]
pub fn default_pipelines() -> BTreeMap<String, Vec<TransformRule>> {
    BTreeMap::from([
        ("credit_card_payment".to_string(), credit_card_pipeline()),
        ("insurance_claims".to_string(), insurance_claims_pipeline()),
    ])
}

fn rename(mappings: &[(&str, &str)]) -> TransformRule {
    TransformRule::RenameColumns {
        mappings: mappings
            .iter()
            .map(|(source, target)| ((*source).to_string(), (*target).to_string()))
            .collect(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

/// Card settlement exports: one row per transaction, US-style dates,
/// amounts without currency symbols but sometimes with grouping commas.
fn credit_card_pipeline() -> Vec<TransformRule> {
    vec![
        rename(&[
            ("Trans. #", "transaction_id"),
            ("Trans. Date", "transaction_date"),
            ("Gross Amt", "cash_applied"),
            ("Client Name", "patient_id"),
            ("Provider", "provider_name"),
        ]),
        TransformRule::DateFormat {
            columns: strings(&["transaction_date"]),
            formats: strings(&["%m-%d-%Y", "%m/%d/%Y"]),
        },
        TransformRule::NumberFormat {
            columns: strings(&["cash_applied"]),
        },
        TransformRule::AddConstant {
            column: "payment_type".to_string(),
            value: "credit_card".to_string(),
        },
    ]
}

/// Insurance claim exports: one check spans several physical rows, with
/// check-level fields blank on continuation rows. `Cash Applied` is the
/// preferred amount; `Check Amount` is the fallback when the posting
/// system left it blank.
fn insurance_claims_pipeline() -> Vec<TransformRule> {
    vec![
        rename(&[
            ("RowId", "transaction_id"),
            ("Check Date", "transaction_date"),
            ("Patient", "patient_id"),
            ("Provider", "provider_name"),
            ("Claim #", "claim_number"),
            ("Payer", "payer_name"),
            ("CPT", "cpt_code"),
            ("Diagnosis", "diagnosis_code"),
            ("Service Date", "service_date"),
        ]),
        TransformRule::ForwardFill {
            columns: strings(&[
                "transaction_id",
                "transaction_date",
                "provider_name",
                "claim_number",
                "payer_name",
            ]),
        },
        TransformRule::NumberFormat {
            columns: strings(&["Check Amount", "Cash Applied"]),
        },
        TransformRule::MergeColumns {
            sources: strings(&["Cash Applied", "Check Amount"]),
            target: "cash_applied".to_string(),
        },
        // the raw check amount keeps its own canonical slot after the merge
        rename(&[("Check Amount", "insurance_payment")]),
        TransformRule::DateFormat {
            columns: strings(&["transaction_date", "service_date"]),
            formats: strings(&["%m/%d/%Y", "%m-%d-%Y"]),
        },
        TransformRule::AddConstant {
            column: "payment_type".to_string(),
            value: "insurance".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_format_has_a_pipeline() {
        let pipelines = default_pipelines();
        assert!(pipelines.contains_key("credit_card_payment"));
        assert!(pipelines.contains_key("insurance_claims"));
        for rules in pipelines.values() {
            assert!(!rules.is_empty());
        }
    }

    #[test]
    fn insurance_merge_prefers_cash_applied() {
        let pipelines = default_pipelines();
        let merge = pipelines["insurance_claims"]
            .iter()
            .find_map(|rule| match rule {
                TransformRule::MergeColumns { sources, target } => Some((sources, target)),
                _ => None,
            })
            .expect("merge rule");
        assert_eq!(merge.0.first().map(String::as_str), Some("Cash Applied"));
        assert_eq!(merge.1, "cash_applied");
    }
}
