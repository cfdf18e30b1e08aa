// Parsing helpers for the quantity table.
//
// Centralizes the dirty CSV/number/text handling so the rest of the
// code can assume clean, typed values.
use chrono::NaiveDate;

/// Date format used for column headers and all serialized dates
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a quantity cell while being forgiving about the formats that
/// show up in planning-tool CSV exports.
///
/// Handles European decimal commas and thousands separators:
/// `"1.234,5"` -> 1234.5, `"1,234.5"` -> 1234.5, `"12,5"` -> 12.5.
/// Empty or non-numeric text parses to 0.0, never an error.
pub fn parse_quantity(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    let normalized = if s.contains('.') && s.contains(',') {
        if s.rfind(',') > s.rfind('.') {
            // "1.234,5": dots are thousands separators
            s.replace('.', "").replace(',', ".")
        } else {
            // "1,234.5": commas are thousands separators
            s.replace(',', "")
        }
    } else if s.contains(',') {
        s.replacen(',', ".", 1)
    } else {
        s.to_string()
    };
    normalized.parse::<f64>().unwrap_or(0.0)
}

/// Lowercase a label and strip the accents common in the source exports,
/// so "Línea Base" and "linea base  " compare equal.
pub fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Parse an ISO `YYYY-MM-DD` string; returns `None` for anything else.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ISO_DATE_FORMAT).ok()
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: &NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Format a quantity for CSV output. Whole numbers lose the trailing
/// fraction so round-tripped files stay close to what the user loaded.
pub fn format_quantity(value: f64) -> String {
    value.to_string()
}
