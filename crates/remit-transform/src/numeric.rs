//! Amount parsing.

/// Currency, grouping, and percent punctuation stripped before coercion.
const STRIP_CHARS: [char; 5] = ['$', ',', '%', '(', ')'];

/// Parses a raw cell into an amount, stripping report punctuation first.
/// Returns `None` for blank or non-numeric leftovers.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !STRIP_CHARS.contains(ch))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}
