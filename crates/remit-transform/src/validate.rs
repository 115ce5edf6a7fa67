//! Post-transform validation of the canonical table.
//!
//! Validation annotates, it never aborts: findings come back alongside
//! the table and are logged as data-quality issues tagged with the table
//! name, column, message, and count.

use polars::prelude::{AnyValue, DataFrame, DataType};
use tracing::warn;

use remit_ingest::{cell_f64, cell_str, is_missing};
use remit_model::{DATE_COLUMNS, IssueKind, REQUIRED_VALUE_COLUMNS, ValidationIssue};

use crate::datetime::parse_canonical_date;

/// Runs all checks over a canonical table.
#[must_use]
pub fn validate_table(table_name: &str, frame: &DataFrame) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    check_required_values(frame, &mut issues);
    check_negative_amounts(frame, &mut issues);
    check_date_columns(frame, &mut issues);

    for issue in &issues {
        warn!(
            table = %table_name,
            column = %issue.column,
            kind = issue.kind.as_str(),
            count = issue.count,
            "data quality issue: {}",
            issue.message
        );
    }
    issues
}

fn check_required_values(frame: &DataFrame, issues: &mut Vec<ValidationIssue>) {
    for column in REQUIRED_VALUE_COLUMNS {
        let Ok(current) = frame.column(column) else {
            continue;
        };
        let missing = (0..frame.height())
            .filter(|idx| is_missing(&current.get(*idx).unwrap_or(AnyValue::Null)))
            .count();
        if missing > 0 {
            issues.push(ValidationIssue {
                kind: IssueKind::MissingRequired,
                column: column.to_string(),
                message: format!("required column '{column}' has {missing} missing value(s)"),
                count: missing,
            });
        }
    }
}

fn check_negative_amounts(frame: &DataFrame, issues: &mut Vec<ValidationIssue>) {
    let Ok(current) = frame.column("cash_applied") else {
        return;
    };
    let negative = (0..frame.height())
        .filter(|idx| {
            cell_f64(&current.get(*idx).unwrap_or(AnyValue::Null))
                .is_some_and(|value| value < 0.0)
        })
        .count();
    if negative > 0 {
        issues.push(ValidationIssue {
            kind: IssueKind::NegativeValues,
            column: "cash_applied".to_string(),
            message: format!("'cash_applied' has {negative} negative value(s)"),
            count: negative,
        });
    }
}

fn check_date_columns(frame: &DataFrame, issues: &mut Vec<ValidationIssue>) {
    for column in DATE_COLUMNS {
        let Ok(current) = frame.column(column) else {
            continue;
        };
        if matches!(current.dtype(), DataType::Date | DataType::Datetime(_, _)) {
            continue;
        }
        let mut invalid = 0usize;
        let mut first_error: Option<String> = None;
        for idx in 0..frame.height() {
            let Some(text) = cell_str(&current.get(idx).unwrap_or(AnyValue::Null)) else {
                continue;
            };
            if let Err(error) = parse_canonical_date(&text) {
                invalid += 1;
                first_error.get_or_insert_with(|| error.to_string());
            }
        }
        if invalid > 0 {
            let detail = first_error.unwrap_or_default();
            issues.push(ValidationIssue {
                kind: IssueKind::InvalidDates,
                column: column.to_string(),
                message: format!("'{column}' has {invalid} malformed date(s): {detail}"),
                count: invalid,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    #[test]
    fn missing_required_and_negative_amount_yield_two_issues() {
        let frame = DataFrame::new(vec![
            Column::new(
                "transaction_date".into(),
                vec![Some("2025-01-04"), Some("2025-01-05")],
            ),
            Column::new("cash_applied".into(), vec![Some(-10.0f64), Some(50.0)]),
            Column::new("provider_name".into(), vec![None, Some("Tammy Maxey")]),
        ])
        .unwrap();

        let issues = validate_table("upload", &frame);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].kind, IssueKind::MissingRequired);
        assert_eq!(issues[0].column, "provider_name");
        assert_eq!(issues[0].count, 1);
        assert_eq!(issues[1].kind, IssueKind::NegativeValues);
        assert_eq!(issues[1].count, 1);
    }

    #[test]
    fn malformed_dates_carry_the_parse_error() {
        let frame = DataFrame::new(vec![Column::new(
            "service_date".into(),
            vec!["2025-01-04", "01/04/2025"],
        )])
        .unwrap();

        let issues = validate_table("upload", &frame);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::InvalidDates);
        assert_eq!(issues[0].count, 1);
        assert!(issues[0].message.contains("service_date"));
    }

    #[test]
    fn clean_table_has_no_issues() {
        let frame = DataFrame::new(vec![
            Column::new("transaction_date".into(), vec!["2025-01-04"]),
            Column::new("cash_applied".into(), vec![55.0f64]),
            Column::new("provider_name".into(), vec!["Tammy Maxey"]),
        ])
        .unwrap();

        assert!(validate_table("upload", &frame).is_empty());
    }
}
