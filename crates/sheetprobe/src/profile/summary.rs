//! Column summaries: counts, distinct values, and samples.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::input::{CellValue, Column, Dataset};

/// Default number of sample values kept per column.
pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

/// Options controlling how summaries are computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Maximum number of sample values per column.
    pub sample_limit: usize,
    /// Text values counted as placeholders (matched trimmed, case-insensitive).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placeholders: Vec<String>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            placeholders: Vec::new(),
        }
    }
}

impl SummaryOptions {
    pub fn with_sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = limit;
        self
    }

    /// Add a placeholder word such as `vacant`.
    pub fn with_placeholder(mut self, word: impl Into<String>) -> Self {
        self.placeholders.push(word.into());
        self
    }

    /// Returns true if `value` is text matching one of the placeholder words.
    pub fn is_placeholder(&self, value: &CellValue) -> bool {
        value.as_text().is_some_and(|text| {
            let text = text.trim();
            self.placeholders
                .iter()
                .any(|p| p.trim().eq_ignore_ascii_case(text))
        })
    }
}

/// Summary statistics for one column.
///
/// `non_missing + missing == total` always holds, and `distinct` never
/// exceeds `non_missing`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Total number of cells (the dataset's row count).
    pub total: usize,
    /// Cells holding a value.
    pub non_missing: usize,
    /// Cells with no recorded value.
    pub missing: usize,
    /// Number of distinct non-missing values.
    pub distinct: usize,
    /// The first non-missing values, in row order.
    pub samples: Vec<CellValue>,
    /// Non-missing cells matching a placeholder word, when any are configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<usize>,
}

impl ColumnSummary {
    /// Compute the summary of a single column.
    pub fn of(column: &Column, options: &SummaryOptions) -> Self {
        let total = column.len();
        let mut non_missing = 0;
        let mut placeholder = 0;
        let mut seen: HashSet<ValueKey<'_>> = HashSet::new();
        let mut samples = Vec::with_capacity(options.sample_limit.min(total));

        for value in column.present() {
            non_missing += 1;
            seen.insert(ValueKey::from(value));

            if samples.len() < options.sample_limit {
                samples.push(value.clone());
            }
            if options.is_placeholder(value) {
                placeholder += 1;
            }
        }

        Self {
            total,
            non_missing,
            missing: total - non_missing,
            distinct: seen.len(),
            samples,
            placeholder: (!options.placeholders.is_empty()).then_some(placeholder),
        }
    }

    /// Fraction of cells that are missing (0.0 for an empty column).
    pub fn missing_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.missing as f64 / self.total as f64
        }
    }
}

/// Summarize the named columns with default options.
///
/// Names absent from the dataset are skipped. The output follows the order
/// of `column_names`.
pub fn summarize<S: AsRef<str>>(
    dataset: &Dataset,
    column_names: &[S],
) -> Vec<(String, ColumnSummary)> {
    summarize_with(dataset, column_names, &SummaryOptions::default())
}

/// Summarize the named columns with explicit options.
pub fn summarize_with<S: AsRef<str>>(
    dataset: &Dataset,
    column_names: &[S],
    options: &SummaryOptions,
) -> Vec<(String, ColumnSummary)> {
    column_names
        .iter()
        .map(|name| name.as_ref())
        .filter_map(|name| match dataset.column(name) {
            Some(column) => Some((name.to_string(), ColumnSummary::of(column, options))),
            None => {
                log::debug!("column '{}' not in dataset, skipping", name);
                None
            }
        })
        .collect()
}

/// Equality key for distinct counting.
///
/// Values of different kinds never compare equal. Numbers compare by exact
/// value with `-0.0 == 0.0` and all NaNs equal.
#[derive(Debug, PartialEq, Eq, Hash)]
enum ValueKey<'a> {
    Empty,
    Text(&'a str),
    Number(u64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Error(&'a str),
}

impl<'a> From<&'a CellValue> for ValueKey<'a> {
    fn from(value: &'a CellValue) -> Self {
        match value {
            CellValue::Empty => ValueKey::Empty,
            CellValue::Text(s) => ValueKey::Text(s),
            CellValue::Number(n) => ValueKey::Number(number_bits(*n)),
            CellValue::Bool(b) => ValueKey::Bool(*b),
            CellValue::DateTime(dt) => ValueKey::DateTime(*dt),
            CellValue::Error(e) => ValueKey::Error(e),
        }
    }
}

fn number_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0f64.to_bits()
    } else {
        n.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn dataset(columns: Vec<(&str, Vec<CellValue>)>) -> Dataset {
        Dataset::from_columns(columns.into_iter().map(|(n, v)| (n.to_string(), v))).unwrap()
    }

    #[test]
    fn test_username_scenario() {
        let ds = dataset(vec![("am_username", vec![text("alice"), CellValue::Empty, text("alice")])]);
        let result = summarize(&ds, &["am_username"]);

        assert_eq!(result.len(), 1);
        let (name, s) = &result[0];
        assert_eq!(name, "am_username");
        assert_eq!(s.total, 3);
        assert_eq!(s.non_missing, 2);
        assert_eq!(s.missing, 1);
        assert_eq!(s.distinct, 1);
        assert_eq!(s.samples, vec![text("alice"), text("alice")]);
        assert_eq!(s.placeholder, None);
    }

    #[test]
    fn test_absent_names_are_skipped() {
        let ds = dataset(vec![
            ("am_username", vec![text("a")]),
            ("am_email", vec![text("a@x.com")]),
        ]);
        let result = summarize(&ds, &["am_email", "store_manager", "am_username"]);

        let names: Vec<&str> = result.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["am_email", "am_username"]);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = dataset(vec![("am_email", vec![])]);
        let result = summarize(&ds, &["am_email"]);

        let (_, s) = &result[0];
        assert_eq!((s.total, s.non_missing, s.missing, s.distinct), (0, 0, 0, 0));
        assert!(s.samples.is_empty());
        assert_eq!(s.missing_ratio(), 0.0);
    }

    #[test]
    fn test_samples_capped_in_row_order() {
        let values: Vec<CellValue> = (0..8)
            .map(|i| if i % 3 == 0 { CellValue::Empty } else { CellValue::Number(i as f64) })
            .collect();
        let ds = dataset(vec![("n", values)]);
        let (_, s) = &summarize(&ds, &["n"])[0];

        let expected: Vec<CellValue> = [1.0, 2.0, 4.0, 5.0, 7.0]
            .into_iter()
            .map(CellValue::Number)
            .collect();
        assert_eq!(s.samples, expected);
    }

    #[test]
    fn test_zero_length_text_is_present() {
        let ds = dataset(vec![("c", vec![text(""), CellValue::Empty])]);
        let (_, s) = &summarize(&ds, &["c"])[0];
        assert_eq!(s.non_missing, 1);
        assert_eq!(s.missing, 1);
    }

    #[test]
    fn test_distinct_equality_policy() {
        let ds = dataset(vec![(
            "v",
            vec![
                CellValue::Number(0.0),
                CellValue::Number(-0.0),
                CellValue::Number(f64::NAN),
                CellValue::Number(f64::NAN),
                text("1"),
                CellValue::Number(1.0),
                text("Alice"),
                text("alice"),
            ],
        )]);
        let (_, s) = &summarize(&ds, &["v"])[0];

        // {0}, {NaN}, "1", 1.0, "Alice", "alice"
        assert_eq!(s.distinct, 6);
    }

    #[test]
    fn test_placeholder_count() {
        let ds = dataset(vec![(
            "store_manager",
            vec![text("Vacant"), text(" vacant "), text("Bob"), CellValue::Empty],
        )]);
        let options = SummaryOptions::default().with_placeholder("vacant");
        let (_, s) = &summarize_with(&ds, &["store_manager"], &options)[0];

        assert_eq!(s.placeholder, Some(2));
        assert_eq!(s.non_missing, 3);
    }

    #[test]
    fn test_custom_sample_limit() {
        let ds = dataset(vec![("c", vec![text("a"), text("b"), text("c")])]);
        let options = SummaryOptions::default().with_sample_limit(2);
        let (_, s) = &summarize_with(&ds, &["c"], &options)[0];
        assert_eq!(s.samples, vec![text("a"), text("b")]);
    }

    #[test]
    fn test_duplicate_request_names() {
        let ds = dataset(vec![("c", vec![text("a")])]);
        assert_eq!(summarize(&ds, &["c", "c"]).len(), 2);
    }
}
