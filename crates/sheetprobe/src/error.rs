//! Error types for the sheetprobe library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sheetprobe operations.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error opening or reading a workbook.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The requested sheet does not exist in the workbook.
    #[error("Sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    /// Empty file, empty sheet, or no header row.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Columns of unequal length supplied when building a dataset.
    #[error("Column '{column}' has {found} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for sheetprobe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;
