//! CSV dialect sniffing.
//!
//! Payer exports disagree on delimiters and some arrive without a header
//! row. Detection needs both settled before any profile scoring happens,
//! so the sniffer inspects a bounded leading sample of the file and
//! returns a [`Dialect`] with the delimiter, quote character, and header
//! presence.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Size of the leading sample used for sniffing.
pub const SNIFF_BYTES: usize = 4096;

/// Delimiters considered, in preference order.
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Ratio thresholds for classifying the first row as a header.
const HEADER_NON_EMPTY_MIN: f64 = 0.8;
const HEADER_ALPHA_MIN: f64 = 0.5;
const HEADER_NUMERIC_MAX: f64 = 0.1;

/// Sniffed CSV dialect: delimiter, quote character, header presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
    pub has_header: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_header: true,
        }
    }
}

/// Sniffs the dialect from the first [`SNIFF_BYTES`] of a file.
pub fn sniff_path(path: &Path) -> Result<Dialect> {
    let file = File::open(path).with_context(|| format!("open for sniff: {}", path.display()))?;
    let mut buffer = Vec::with_capacity(SNIFF_BYTES);
    file.take(SNIFF_BYTES as u64)
        .read_to_end(&mut buffer)
        .with_context(|| format!("read sniff sample: {}", path.display()))?;
    // lossy: the sample may end mid multi-byte character
    let sample = String::from_utf8_lossy(&buffer);
    Ok(sniff_sample(&sample))
}

/// Sniffs the dialect from an in-memory sample.
#[must_use]
pub fn sniff_sample(sample: &str) -> Dialect {
    let mut lines: Vec<&str> = sample
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(20)
        .collect();
    // the sample window may have cut the final line short
    if !sample.ends_with('\n') && lines.len() > 1 {
        lines.pop();
    }
    if lines.is_empty() {
        return Dialect::default();
    }

    let delimiter = pick_delimiter(&lines);
    let has_header = header_present(&lines, delimiter);
    Dialect {
        delimiter,
        quote: b'"',
        has_header,
    }
}

/// Picks the candidate whose field count is consistent across the sampled
/// lines, preferring the one that splits into the most fields. Falls back
/// to the highest first-line count, then to a comma.
fn pick_delimiter(lines: &[&str]) -> u8 {
    let mut best: Option<(u8, usize)> = None;
    for candidate in DELIMITER_CANDIDATES {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| field_count(line, candidate))
            .collect();
        let first = counts[0];
        if first < 2 || !counts.iter().all(|count| *count == first) {
            continue;
        }
        if best.is_none_or(|(_, fields)| first > fields) {
            best = Some((candidate, first));
        }
    }
    if let Some((delimiter, _)) = best {
        return delimiter;
    }
    DELIMITER_CANDIDATES
        .into_iter()
        .max_by_key(|candidate| field_count(lines[0], *candidate))
        .filter(|candidate| field_count(lines[0], *candidate) > 1)
        .unwrap_or(b',')
}

/// Counts fields on one line, ignoring delimiters inside double quotes.
fn field_count(line: &str, delimiter: u8) -> usize {
    let mut count = 1usize;
    let mut in_quotes = false;
    for byte in line.bytes() {
        match byte {
            b'"' => in_quotes = !in_quotes,
            b if b == delimiter && !in_quotes => count += 1,
            _ => {}
        }
    }
    count
}

/// Per-row cell statistics used to tell header rows from data rows.
#[derive(Debug, Default, Clone, Copy)]
struct RowStats {
    total: usize,
    non_empty: usize,
    numeric: usize,
    alpha: usize,
}

impl RowStats {
    fn ratio(self, part: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            part as f64 / self.total as f64
        }
    }

    fn is_header_like(self) -> bool {
        self.ratio(self.non_empty) >= HEADER_NON_EMPTY_MIN
            && self.ratio(self.alpha) >= HEADER_ALPHA_MIN
            && self.ratio(self.numeric) <= HEADER_NUMERIC_MAX
    }
}

fn row_stats(cells: &[String]) -> RowStats {
    let mut stats = RowStats {
        total: cells.len(),
        ..RowStats::default()
    };
    for cell in cells {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        stats.non_empty += 1;
        if trimmed.parse::<f64>().is_ok() {
            stats.numeric += 1;
        }
        if trimmed.chars().any(|ch| ch.is_ascii_alphabetic()) {
            stats.alpha += 1;
        }
    }
    stats
}

/// The first row is a header when it reads like column labels: almost
/// fully populated, mostly alphabetic, and (unlike a settlement data row)
/// essentially free of numeric cells.
fn header_present(lines: &[&str], delimiter: u8) -> bool {
    let first = split_fields(lines[0], delimiter);
    row_stats(&first).is_header_like()
}

/// Splits one line into cells, honoring double quotes with `""` escapes.
fn split_fields(line: &str, delimiter: u8) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut bytes = line.bytes().peekable();
    while let Some(byte) = bytes.next() {
        match byte {
            b'"' => {
                if in_quotes && bytes.peek() == Some(&b'"') {
                    bytes.next();
                    current.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            b if b == delimiter && !in_quotes => {
                cells.push(std::mem::take(&mut current));
            }
            other => current.push(other as char),
        }
    }
    cells.push(current);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_comma_with_header() {
        let dialect = sniff_sample("Trans. #,Trans. Date,Provider\n9690,01-04-2025,Tammy Maxey\n");
        assert_eq!(dialect.delimiter, b',');
        assert!(dialect.has_header);
    }

    #[test]
    fn sniffs_semicolon_and_tab() {
        let semi = sniff_sample("RowId;Check Date;Provider\n1;01/02/2025;Smith\n");
        assert_eq!(semi.delimiter, b';');
        let tab = sniff_sample("RowId\tCheck Date\tProvider\n1\t01/02/2025\tSmith\n");
        assert_eq!(tab.delimiter, b'\t');
    }

    #[test]
    fn quoted_delimiters_do_not_split() {
        assert_eq!(field_count(r#""Smith, John",100"#, b','), 2);
    }

    #[test]
    fn numeric_first_row_means_no_header() {
        let dialect = sniff_sample("9690,55.00,2025\n9691,60.00,2025\n");
        assert!(!dialect.has_header);
    }

    #[test]
    fn generic_headers_still_count_as_header() {
        let dialect = sniff_sample("Column1,Column2,Column3,Column4\na,b,c,1\n");
        assert!(dialect.has_header);
    }

    #[test]
    fn truncated_last_line_is_ignored() {
        let dialect = sniff_sample("A,B,C\n1,2,3\n4,5");
        assert_eq!(dialect.delimiter, b',');
    }
}
