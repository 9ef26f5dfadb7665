//! Data source abstraction and metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::cell::CellValue;
use crate::error::{ProbeError, Result};

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (xlsx, csv, tsv, etc.).
    pub format: String,
    /// Sheet the dataset was read from.
    pub sheet: String,
    /// All sheets in the source, in workbook order.
    pub sheet_names: Vec<String>,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        sheet: String,
        sheet_names: Vec<String>,
        dataset: &Dataset,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            sheet,
            sheet_names,
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            loaded_at: Utc::now(),
        }
    }
}

/// The cells of one column, in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Column {
    values: Vec<CellValue>,
}

impl Column {
    pub fn new(values: Vec<CellValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Cells that are not the missing marker, in row order.
    pub fn present(&self) -> impl Iterator<Item = &CellValue> {
        self.values.iter().filter(|v| !v.is_missing())
    }
}

/// Tabular data held in memory, keyed by column name in header order.
///
/// Every column has exactly `row_count` cells.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: IndexMap<String, Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset from a header row and row-major cells.
    ///
    /// Short rows are padded with `Empty`, long rows are truncated. Blank
    /// headers become `Unnamed: <index>` and repeated headers get a `.N`
    /// suffix.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let names = normalize_headers(headers);
        let row_count = rows.len();

        let mut buffers: Vec<Vec<CellValue>> = names
            .iter()
            .map(|_| Vec::with_capacity(row_count))
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for buffer in buffers.iter_mut() {
                buffer.push(cells.next().unwrap_or(CellValue::Empty));
            }
        }

        let columns = names
            .into_iter()
            .zip(buffers)
            .map(|(name, values)| (name, Column::new(values)))
            .collect();

        Self { columns, row_count }
    }

    /// Build a dataset from named columns, which must all have the same length.
    pub fn from_columns(
        columns: impl IntoIterator<Item = (String, Vec<CellValue>)>,
    ) -> Result<Self> {
        let mut map: IndexMap<String, Column> = IndexMap::new();
        let mut row_count: Option<usize> = None;

        for (name, values) in columns {
            let expected = *row_count.get_or_insert(values.len());
            if values.len() != expected {
                return Err(ProbeError::RaggedColumn {
                    column: name,
                    expected,
                    found: values.len(),
                });
            }
            map.insert(name, Column::new(values));
        }

        Ok(Self {
            columns: map,
            row_count: row_count.unwrap_or(0),
        })
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count, self.columns.len())
    }

    /// Column names in header order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Iterate over (name, column) pairs in header order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.columns
            .get_index(col)
            .and_then(|(_, c)| c.values().get(row))
    }

    /// The first `n` rows in row-major order.
    pub fn head(&self, n: usize) -> Vec<Vec<CellValue>> {
        (0..n.min(self.row_count))
            .map(|row| {
                self.columns
                    .values()
                    .map(|c| c.values()[row].clone())
                    .collect()
            })
            .collect()
    }
}

fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(headers.len());

    for (index, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            header
        };

        let mut name = base.clone();
        let mut suffix = 0;
        while names.contains(&name) {
            suffix += 1;
            name = format!("{}.{}", base, suffix);
        }
        names.push(name);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_pads_and_truncates_rows() {
        let ds = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![vec![text("1")], vec![text("2"), text("3"), text("4")]],
        );

        assert_eq!(ds.shape(), (2, 2));
        assert_eq!(ds.get(0, 1), Some(&CellValue::Empty));
        assert_eq!(ds.get(1, 1), Some(&text("3")));
        assert_eq!(ds.get(1, 2), None);
    }

    #[test]
    fn test_header_normalization() {
        let ds = Dataset::new(
            vec!["id".into(), "".into(), "id".into(), "id".into()],
            Vec::new(),
        );
        assert_eq!(ds.column_names(), vec!["id", "Unnamed: 1", "id.1", "id.2"]);
    }

    #[test]
    fn test_lookup_is_presence_checked() {
        let ds = Dataset::new(vec!["name".into()], vec![vec![text("x")]]);
        assert!(ds.column("name").is_some());
        assert!(ds.column("Name").is_none());
        assert!(!ds.contains("missing"));
    }

    #[test]
    fn test_from_columns_rejects_ragged() {
        let err = Dataset::from_columns(vec![
            ("a".to_string(), vec![text("1"), text("2")]),
            ("b".to_string(), vec![text("1")]),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            ProbeError::RaggedColumn { expected: 2, found: 1, .. }
        ));
    }

    #[test]
    fn test_head() {
        let ds = Dataset::new(
            vec!["a".into()],
            vec![vec![text("1")], vec![text("2")], vec![text("3")]],
        );
        assert_eq!(ds.head(2), vec![vec![text("1")], vec![text("2")]]);
        assert_eq!(ds.head(10).len(), 3);
    }
}
