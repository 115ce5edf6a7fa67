//! Date parsing and the canonical output format.
//!
//! Automatic parsing covers ISO and unambiguous month-name formats only.
//! Purely numeric day/month orderings (`01-04-2025`) are left to each
//! pipeline's explicit format list, because the right reading depends on
//! the payer that produced the file.

use chrono::{NaiveDate, NaiveDateTime};

/// Output representation for every canonical date column.
pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

const AUTO_DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%d-%b-%Y",  // 04-Jan-2025
    "%d %b %Y",  // 4 Jan 2025
    "%b %d, %Y", // Jan 4, 2025
    "%B %d, %Y", // January 4, 2025
    "%Y-%b-%d",  // 2025-Jan-04
];

const AUTO_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Attempts the automatic (unambiguous) formats.
#[must_use]
pub fn parse_date_auto(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in &AUTO_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in &AUTO_DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    None
}

/// Automatic parse first, then the explicit formats in order, stopping at
/// the first success.
#[must_use]
pub fn parse_date_value(value: &str, formats: &[String]) -> Option<NaiveDate> {
    if let Some(date) = parse_date_auto(value) {
        return Some(date);
    }
    let trimmed = value.trim();
    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

/// Strict parse in the canonical output format, keeping the parse error
/// for validation messages.
pub fn parse_canonical_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_OUTPUT_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_dates_parse_automatically() {
        assert_eq!(
            parse_date_auto("2025-01-04"),
            NaiveDate::from_ymd_opt(2025, 1, 4)
        );
        assert_eq!(
            parse_date_auto("Jan 4, 2025"),
            NaiveDate::from_ymd_opt(2025, 1, 4)
        );
    }

    #[test]
    fn numeric_orderings_need_explicit_formats() {
        assert_eq!(parse_date_auto("01-04-2025"), None);
        let formats = vec!["%m-%d-%Y".to_string()];
        assert_eq!(
            parse_date_value("01-04-2025", &formats),
            NaiveDate::from_ymd_opt(2025, 1, 4)
        );
    }

    #[test]
    fn explicit_formats_stop_at_first_success() {
        let formats = vec!["%m/%d/%Y".to_string(), "%d/%m/%Y".to_string()];
        // both formats accept this value; the first listed wins
        assert_eq!(
            parse_date_value("02/03/2025", &formats),
            NaiveDate::from_ymd_opt(2025, 2, 3)
        );
    }

    #[test]
    fn canonical_parse_reports_errors() {
        assert!(parse_canonical_date("2025-01-04").is_ok());
        assert!(parse_canonical_date("not a date").is_err());
    }
}
