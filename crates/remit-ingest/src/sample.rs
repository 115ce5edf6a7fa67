//! Sampled reads for format detection.

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use crate::dialect::Dialect;

/// Header row plus the first data rows of a delimited file.
#[derive(Debug, Clone)]
pub struct SampleTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    raw.trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads the header row and up to `max_rows` data rows with the sniffed
/// dialect. Rows are padded or truncated to the header width so callers
/// can index by header position.
pub fn read_sample(path: &Path, dialect: Dialect, max_rows: usize) -> Result<SampleTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open csv sample: {}", path.display()))?;

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => {
            let record = record.with_context(|| format!("read header: {}", path.display()))?;
            record.iter().map(normalize_header).collect()
        }
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for record in records.take(max_rows) {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).unwrap_or("");
            row.push(normalize_cell(value));
        }
        rows.push(row);
    }

    Ok(SampleTable { headers, rows })
}
