//! Typed cell values.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// ISO-like dates, optionally followed by a time component.
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}([T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?)?$")
        .expect("date pattern is valid")
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A single cell of a loaded dataset.
///
/// `Empty` is the only missing marker. A zero-length `Text` is a recorded
/// value and counts as present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// No recorded value.
    Empty,
    /// Text value, kept verbatim.
    Text(String),
    /// Numeric value (integers are stored as whole floats).
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Date or date-time value.
    DateTime(NaiveDateTime),
    /// Spreadsheet error value such as `#DIV/0!`.
    Error(String),
}

impl CellValue {
    /// Returns true if this cell is the missing marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Infer a typed value from a raw delimited-text field.
    ///
    /// Only an empty field is treated as missing; whitespace-only fields
    /// stay as text.
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return CellValue::Empty;
        }

        let trimmed = raw.trim();

        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Bool(false);
        }

        // f64 parsing accepts "inf" and "NaN"; require at least one digit.
        if trimmed.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(n) = trimmed.parse::<f64>() {
                return CellValue::Number(n);
            }
        }

        if let Some(dt) = parse_datetime(trimmed) {
            return CellValue::DateTime(dt);
        }

        CellValue::Text(raw.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => {
                if dt.time() == NaiveTime::MIN {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            CellValue::Error(e) => f.write_str(e),
        }
    }
}

/// Parse an ISO-style date or date-time string.
pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if !DATE_PATTERN.is_match(value) {
        return None;
    }

    if value.len() == 10 {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_infer_values() {
        assert_eq!(CellValue::infer(""), CellValue::Empty);
        assert_eq!(CellValue::infer("42"), CellValue::Number(42.0));
        assert_eq!(CellValue::infer(" 3.5 "), CellValue::Number(3.5));
        assert_eq!(CellValue::infer("TRUE"), CellValue::Bool(true));
        assert_eq!(CellValue::infer("2024-03-01"), CellValue::DateTime(date(2024, 3, 1)));
        assert_eq!(CellValue::infer("alice"), CellValue::Text("alice".to_string()));
    }

    #[test]
    fn test_infer_keeps_blank_text() {
        assert_eq!(CellValue::infer("  "), CellValue::Text("  ".to_string()));
        assert!(!CellValue::infer("  ").is_missing());
    }

    #[test]
    fn test_infer_rejects_word_floats() {
        assert_eq!(CellValue::infer("NaN"), CellValue::Text("NaN".to_string()));
        assert_eq!(CellValue::infer("inf"), CellValue::Text("inf".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(7.0).to_string(), "7");
        assert_eq!(CellValue::Number(7.25).to_string(), "7.25");
        assert_eq!(CellValue::DateTime(date(2023, 12, 31)).to_string(), "2023-12-31");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_parse_datetime_with_time() {
        let dt = parse_datetime("2024-01-02T03:04:05").unwrap();
        assert_eq!(dt.format("%H:%M:%S").to_string(), "03:04:05");
        assert!(parse_datetime("02/01/2024").is_none());
    }
}
