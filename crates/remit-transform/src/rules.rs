//! The transformation rule family.
//!
//! Rules are a closed set of tagged variants sharing one contract:
//! `apply` takes a frame and returns a new frame, never mutating its
//! input. Pipelines are plain `Vec<TransformRule>` values and serialize
//! as data, so a format's cleaning sequence reads as configuration.

use std::collections::BTreeMap;

use polars::prelude::{
    AnyValue, Column, DataFrame, DataType, IntoSeries, PolarsError, StringChunkedBuilder,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use remit_ingest::{cell_f64, cell_str};

use crate::datetime::{DATE_OUTPUT_FORMAT, parse_date_value};
use crate::numeric::parse_amount;

/// Failure inside a single rule application.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid split pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// One composable cleaning step over a tabular frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformRule {
    /// Rename source columns; mappings for absent columns are ignored.
    RenameColumns { mappings: BTreeMap<String, String> },
    /// Normalize date columns to the canonical output format, retrying
    /// the explicit formats for values automatic parsing rejects.
    DateFormat {
        columns: Vec<String>,
        #[serde(default)]
        formats: Vec<String>,
    },
    /// Strip report punctuation and coerce columns to numbers.
    NumberFormat { columns: Vec<String> },
    /// Row-wise first non-null over sources, in listed priority order.
    MergeColumns { sources: Vec<String>, target: String },
    /// Capture-group split of one source column into target columns.
    SplitColumn {
        source: String,
        pattern: String,
        targets: Vec<String>,
    },
    /// Propagate the last non-null value downward per column.
    ForwardFill { columns: Vec<String> },
    /// Stamp one fixed value on every row of a column.
    AddConstant { column: String, value: String },
}

impl TransformRule {
    /// Stable rule name used in the audit trace.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RenameColumns { .. } => "rename_columns",
            Self::DateFormat { .. } => "date_format",
            Self::NumberFormat { .. } => "number_format",
            Self::MergeColumns { .. } => "merge_columns",
            Self::SplitColumn { .. } => "split_column",
            Self::ForwardFill { .. } => "forward_fill",
            Self::AddConstant { .. } => "add_constant",
        }
    }

    /// Applies the rule, returning a new frame.
    pub fn apply(&self, frame: &DataFrame) -> Result<DataFrame, RuleError> {
        match self {
            Self::RenameColumns { mappings } => apply_rename(frame, mappings),
            Self::DateFormat { columns, formats } => apply_date_format(frame, columns, formats),
            Self::NumberFormat { columns } => apply_number_format(frame, columns),
            Self::MergeColumns { sources, target } => apply_merge(frame, sources, target),
            Self::SplitColumn {
                source,
                pattern,
                targets,
            } => apply_split(frame, source, pattern, targets),
            Self::ForwardFill { columns } => apply_forward_fill(frame, columns),
            Self::AddConstant { column, value } => apply_add_constant(frame, column, value),
        }
    }
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

fn apply_rename(
    frame: &DataFrame,
    mappings: &BTreeMap<String, String>,
) -> Result<DataFrame, RuleError> {
    let mut out = frame.clone();
    for (source, target) in mappings {
        if out.column(source).is_ok() {
            out.rename(source, target.as_str().into())?;
        }
    }
    Ok(out)
}

fn apply_date_format(
    frame: &DataFrame,
    columns: &[String],
    formats: &[String],
) -> Result<DataFrame, RuleError> {
    let mut out = frame.clone();
    for column in columns {
        let Ok(current) = out.column(column) else {
            continue;
        };
        if matches!(current.dtype(), DataType::Date | DataType::Datetime(_, _)) {
            continue;
        }
        let Ok(strings) = current.str() else {
            continue;
        };

        let mut builder = StringChunkedBuilder::new(column.as_str().into(), out.height());
        let mut unparseable = 0usize;
        for value in strings {
            match value.map(str::trim) {
                None | Some("") => builder.append_null(),
                Some(raw) => match parse_date_value(raw, formats) {
                    Some(date) => {
                        builder.append_value(date.format(DATE_OUTPUT_FORMAT).to_string());
                    }
                    None => {
                        unparseable += 1;
                        builder.append_null();
                    }
                },
            }
        }
        if unparseable > 0 {
            warn!(column = %column, count = unparseable, "unparseable dates set to null");
        }
        out.with_column(builder.finish().into_series())?;
    }
    Ok(out)
}

fn apply_number_format(frame: &DataFrame, columns: &[String]) -> Result<DataFrame, RuleError> {
    let mut out = frame.clone();
    for column in columns {
        let Ok(current) = out.column(column) else {
            continue;
        };
        if is_numeric_dtype(current.dtype()) {
            continue;
        }
        let Ok(strings) = current.str() else {
            continue;
        };

        let mut values: Vec<Option<f64>> = Vec::with_capacity(out.height());
        let mut unparseable = 0usize;
        for value in strings {
            match value.map(str::trim) {
                None | Some("") => values.push(None),
                Some(raw) => match parse_amount(raw) {
                    Some(amount) => values.push(Some(amount)),
                    None => {
                        unparseable += 1;
                        values.push(None);
                    }
                },
            }
        }
        if unparseable > 0 {
            warn!(column = %column, count = unparseable, "non-numeric values set to null");
        }
        out.with_column(Column::new(column.as_str().into(), values))?;
    }
    Ok(out)
}

fn apply_merge(
    frame: &DataFrame,
    sources: &[String],
    target: &str,
) -> Result<DataFrame, RuleError> {
    let mut out = frame.clone();
    let present: Vec<Column> = sources
        .iter()
        .filter_map(|source| out.column(source).ok().cloned())
        .collect();

    if present.is_empty() {
        out.with_column(Column::full_null(
            target.into(),
            out.height(),
            &DataType::String,
        ))?;
        return Ok(out);
    }

    let column = if present.iter().all(|col| is_numeric_dtype(col.dtype())) {
        let values: Vec<Option<f64>> = (0..out.height())
            .map(|idx| {
                present
                    .iter()
                    .find_map(|col| cell_f64(&col.get(idx).unwrap_or(AnyValue::Null)))
            })
            .collect();
        Column::new(target.into(), values)
    } else {
        let values: Vec<Option<String>> = (0..out.height())
            .map(|idx| {
                present
                    .iter()
                    .find_map(|col| cell_str(&col.get(idx).unwrap_or(AnyValue::Null)))
            })
            .collect();
        Column::new(target.into(), values)
    };
    out.with_column(column)?;
    Ok(out)
}

fn apply_split(
    frame: &DataFrame,
    source: &str,
    pattern: &str,
    targets: &[String],
) -> Result<DataFrame, RuleError> {
    let regex = Regex::new(pattern).map_err(|error| RuleError::InvalidPattern {
        pattern: pattern.to_string(),
        source: error,
    })?;

    let mut out = frame.clone();
    let captured: Option<Vec<Vec<Option<String>>>> = {
        let Ok(current) = out.column(source) else {
            return Ok(out);
        };
        current.str().ok().map(|strings| {
            let mut groups: Vec<Vec<Option<String>>> =
                vec![Vec::with_capacity(out.height()); targets.len()];
            for value in strings {
                let captures = value.and_then(|raw| regex.captures(raw.trim()));
                for (group_idx, group) in groups.iter_mut().enumerate() {
                    group.push(captures.as_ref().and_then(|caps| {
                        caps.get(group_idx + 1).map(|m| m.as_str().to_string())
                    }));
                }
            }
            groups
        })
    };

    if let Some(groups) = captured {
        for (target, values) in targets.iter().zip(groups) {
            out.with_column(Column::new(target.as_str().into(), values))?;
        }
    }
    Ok(out)
}

fn apply_forward_fill(frame: &DataFrame, columns: &[String]) -> Result<DataFrame, RuleError> {
    let mut out = frame.clone();
    for column in columns {
        let Ok(current) = out.column(column) else {
            continue;
        };
        let filled = if is_numeric_dtype(current.dtype()) {
            let mut last: Option<f64> = None;
            let values: Vec<Option<f64>> = (0..out.height())
                .map(|idx| {
                    if let Some(value) = cell_f64(&current.get(idx).unwrap_or(AnyValue::Null)) {
                        last = Some(value);
                    }
                    last
                })
                .collect();
            Column::new(column.as_str().into(), values)
        } else {
            let mut last: Option<String> = None;
            let values: Vec<Option<String>> = (0..out.height())
                .map(|idx| {
                    if let Some(value) = cell_str(&current.get(idx).unwrap_or(AnyValue::Null)) {
                        last = Some(value);
                    }
                    last.clone()
                })
                .collect();
            Column::new(column.as_str().into(), values)
        };
        out.with_column(filled)?;
    }
    Ok(out)
}

fn apply_add_constant(
    frame: &DataFrame,
    column: &str,
    value: &str,
) -> Result<DataFrame, RuleError> {
    let mut out = frame.clone();
    out.with_column(Column::new(column.into(), vec![value; out.height()]))?;
    Ok(out)
}
