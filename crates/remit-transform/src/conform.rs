//! Canonical schema conformance.

use polars::prelude::{Column, DataFrame, DataType, PolarsResult};

use remit_model::{CANONICAL_COLUMNS, is_amount_column};

/// Reshapes a pipeline result to exactly the canonical column set.
///
/// Absent canonical columns are added null-filled, amount columns are
/// coerced to Float64, non-canonical leftovers are dropped, and the
/// output order is exactly the canonical order.
pub fn conform_to_canonical(frame: &DataFrame) -> PolarsResult<DataFrame> {
    let height = frame.height();
    let mut columns: Vec<Column> = Vec::with_capacity(CANONICAL_COLUMNS.len());
    for name in CANONICAL_COLUMNS {
        let target_dtype = if is_amount_column(name) {
            DataType::Float64
        } else {
            DataType::String
        };
        let column = match frame.column(name) {
            Ok(existing) if existing.dtype() == &target_dtype => existing.clone(),
            Ok(existing) => existing.cast(&target_dtype)?,
            Err(_) => Column::full_null(name.into(), height, &target_dtype),
        };
        columns.push(column);
    }
    DataFrame::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_has_exactly_the_canonical_columns_in_order() {
        let frame = DataFrame::new(vec![
            Column::new("provider_name".into(), vec!["Smith"]),
            Column::new("Leftover".into(), vec!["x"]),
            Column::new("cash_applied".into(), vec![55.0f64]),
        ])
        .unwrap();

        let canonical = conform_to_canonical(&frame).unwrap();
        let names: Vec<&str> = canonical.get_column_names_str();
        assert_eq!(names, CANONICAL_COLUMNS.to_vec());
        assert_eq!(canonical.height(), 1);
        // absent canonical columns are null-filled
        assert_eq!(canonical.column("notes").unwrap().null_count(), 1);
    }

    #[test]
    fn string_amounts_are_coerced_to_float() {
        let frame =
            DataFrame::new(vec![Column::new("cash_applied".into(), vec!["55.5", "x"])]).unwrap();

        let canonical = conform_to_canonical(&frame).unwrap();
        let amounts = canonical.column("cash_applied").unwrap();
        assert_eq!(amounts.dtype(), &DataType::Float64);
        assert_eq!(amounts.f64().unwrap().get(0), Some(55.5));
        assert_eq!(amounts.f64().unwrap().get(1), None);
    }
}
