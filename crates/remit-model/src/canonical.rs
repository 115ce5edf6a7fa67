//! Canonical transaction schema.
//!
//! Every transformed report converges to this fixed, ordered column set.
//! Downstream import expects exactly these columns in exactly this order;
//! unmapped columns are present but null-filled.

/// The canonical transaction columns, in output order.
pub const CANONICAL_COLUMNS: [&str; 16] = [
    "transaction_id",
    "transaction_date",
    "patient_id",
    "provider_id",
    "provider_name",
    "cash_applied",
    "insurance_payment",
    "patient_payment",
    "adjustment_amount",
    "payer_name",
    "payment_type",
    "claim_number",
    "cpt_code",
    "diagnosis_code",
    "service_date",
    "notes",
];

/// Canonical columns holding monetary amounts (Float64 in the output frame).
pub const AMOUNT_COLUMNS: [&str; 4] = [
    "cash_applied",
    "insurance_payment",
    "patient_payment",
    "adjustment_amount",
];

/// Canonical columns holding dates (formatted `YYYY-MM-DD`).
pub const DATE_COLUMNS: [&str; 2] = ["transaction_date", "service_date"];

/// Columns that must be non-null in every row of a transformed table.
pub const REQUIRED_VALUE_COLUMNS: [&str; 3] =
    ["transaction_date", "cash_applied", "provider_name"];

/// Returns true if `name` is a canonical amount column.
#[must_use]
pub fn is_amount_column(name: &str) -> bool {
    AMOUNT_COLUMNS.contains(&name)
}

/// Returns true if `name` is a canonical date column.
#[must_use]
pub fn is_date_column(name: &str) -> bool {
    DATE_COLUMNS.contains(&name)
}

/// Returns true if `name` is part of the canonical schema.
#[must_use]
pub fn is_canonical_column(name: &str) -> bool {
    CANONICAL_COLUMNS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_and_date_columns_are_canonical() {
        for name in AMOUNT_COLUMNS.iter().chain(DATE_COLUMNS.iter()) {
            assert!(is_canonical_column(name), "{name} missing from schema");
        }
    }

    #[test]
    fn required_columns_are_canonical() {
        for name in REQUIRED_VALUE_COLUMNS {
            assert!(is_canonical_column(name));
        }
    }
}
