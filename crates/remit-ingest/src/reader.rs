//! Full-file loading into a Polars DataFrame.

use std::path::Path;

use anyhow::{Context, Result};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::{DataFrame, PlSmallStr, SerReader};
use tracing::debug;

use crate::dialect::Dialect;

/// Reads the whole file into a DataFrame with every column typed as
/// String. Type coercion is the pipeline's job; schema inference here
/// would guess differently per file and make rule behavior depend on the
/// sample instead of the declared pipeline.
pub fn read_frame(path: &Path, dialect: Dialect) -> Result<DataFrame> {
    let parse_options = CsvParseOptions::default()
        .with_separator(dialect.delimiter)
        .with_quote_char(Some(dialect.quote));

    let mut frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("open csv: {}", path.display()))?
        .finish()
        .with_context(|| format!("read csv: {}", path.display()))?;

    normalize_column_names(&mut frame)?;
    debug!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "loaded report file"
    );
    Ok(frame)
}

/// Strips BOM and collapses whitespace in header names, matching how the
/// sampled headers are normalized for detection.
fn normalize_column_names(frame: &mut DataFrame) -> Result<()> {
    let renames: Vec<(PlSmallStr, String)> = frame
        .get_column_names_owned()
        .into_iter()
        .filter_map(|name| {
            let normalized = name
                .trim_matches('\u{feff}')
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            (normalized != name.as_str()).then(|| (name, normalized))
        })
        .collect();
    for (old, new) in renames {
        frame
            .rename(old.as_str(), new.into())
            .with_context(|| format!("normalize column name: {old}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataType;
    use std::io::Write;

    #[test]
    fn every_column_reads_as_string() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "id,amount\n1,55.0\n2,60.5\n").unwrap();

        let frame = read_frame(file.path(), Dialect::default()).unwrap();
        for column in frame.get_columns() {
            assert_eq!(column.dtype(), &DataType::String);
        }
        assert_eq!(frame.height(), 2);
    }

    #[test]
    fn header_names_are_normalized() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\u{feff} Trans.   # ,Provider\n1,Smith\n").unwrap();

        let frame = read_frame(file.path(), Dialect::default()).unwrap();
        let names: Vec<&str> = frame.get_column_names_str();
        assert_eq!(names, vec!["Trans. #", "Provider"]);
    }
}
