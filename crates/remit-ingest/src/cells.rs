//! Polars `AnyValue` helpers shared by the transform and validation layers.

use polars::prelude::AnyValue;

/// String form of a cell, `None` when null or blank.
#[must_use]
pub fn cell_str(value: &AnyValue<'_>) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => format_amount(*v),
        AnyValue::Float32(v) => format_amount(f64::from(*v)),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Boolean(v) => v.to_string(),
        other => other.to_string(),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Numeric form of a cell, `None` for null or non-numeric values.
#[must_use]
pub fn cell_f64(value: &AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Float64(v) => Some(*v),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::String(s) => s.trim().parse().ok(),
        AnyValue::StringOwned(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// True when the cell is null or an all-whitespace string.
#[must_use]
pub fn is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::String(s) => s.trim().is_empty(),
        AnyValue::StringOwned(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Formats an amount without trailing zeros (`55.0` -> `"55"`).
#[must_use]
pub fn format_amount(value: f64) -> String {
    let text = format!("{value}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
