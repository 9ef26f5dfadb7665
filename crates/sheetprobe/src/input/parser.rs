//! File loader: spreadsheets via calamine, delimited text via csv.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::cell::CellValue;
use super::source::{Dataset, SourceMetadata};
use super::workbook;
use crate::error::{ProbeError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Extensions read through the workbook reader.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlam", "xlsb", "xls", "xla", "ods"];

/// Extensions read as delimited text.
const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Sheet to read (None = `Sheet1` if present, else the first sheet).
    pub sheet: Option<String>,
    /// Delimiter for text files (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum data rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character for text files.
    pub quote: u8,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sheet: None,
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

impl LoaderConfig {
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Workbook,
    Delimited,
}

/// Loads tabular files into a [`Dataset`].
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a file and return the dataset and its metadata.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();
        let contents = read_file(path)?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (dataset, format, sheet, sheet_names) = match file_kind(path)? {
            FileKind::Workbook => {
                let sheet =
                    workbook::read_sheet(path, self.config.sheet.as_deref(), self.config.max_rows)?;
                (sheet.dataset, extension(path), sheet.name, sheet.sheet_names)
            }
            FileKind::Delimited => {
                let delimiter = match self.config.delimiter {
                    Some(d) => d,
                    None if extension(path) == "tsv" => b'\t',
                    None => detect_delimiter(&contents)?,
                };
                let dataset = self.parse_bytes(&contents, delimiter)?;
                let format = delimited_format(delimiter);
                (dataset, format.clone(), format.clone(), vec![format])
            }
        };

        log::info!(
            "loaded {} ({} rows x {} columns) from sheet '{}'",
            path.display(),
            dataset.row_count(),
            dataset.column_count(),
            sheet
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            sheet,
            sheet_names,
            &dataset,
        );

        Ok((dataset, metadata))
    }

    /// List the sheets a file exposes.
    ///
    /// Delimited files expose a single sheet named after their format.
    pub fn sheet_names(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        let path = path.as_ref();
        match file_kind(path)? {
            FileKind::Workbook => workbook::sheet_names(path),
            FileKind::Delimited => {
                let contents = read_file(path)?;
                let delimiter = match self.config.delimiter {
                    Some(d) => d,
                    None if extension(path) == "tsv" => b'\t',
                    None => detect_delimiter(&contents)?,
                };
                Ok(vec![delimited_format(delimiter)])
            }
        }
    }

    /// Parse delimited bytes directly.
    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        if headers.is_empty() {
            return Err(ProbeError::EmptyData("No header row found".to_string()));
        }

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            rows.push(record.iter().map(CellValue::infer).collect());
        }

        Ok(Dataset::new(headers, rows))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| ProbeError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(|e| ProbeError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(contents)
}

fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

fn file_kind(path: &Path) -> Result<FileKind> {
    let ext = extension(path);
    if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
        Ok(FileKind::Workbook)
    } else if DELIMITED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(FileKind::Delimited)
    } else if ext.is_empty() {
        Err(ProbeError::UnsupportedFormat(format!(
            "'{}' has no file extension",
            path.display()
        )))
    } else {
        Err(ProbeError::UnsupportedFormat(format!(".{}", ext)))
    }
}

fn delimited_format(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
    .to_string()
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ProbeError::EmptyData("No header row found".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tab breaks ties.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    log::debug!("detected delimiter {:?}", best_delimiter as char);
    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted() {
        let data = b"name;note\n\"Smith, J\";x\n\"Doe, A\";y";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_detect_delimiter_empty() {
        assert!(matches!(detect_delimiter(b"\n\n"), Err(ProbeError::EmptyData(_))));
    }

    #[test]
    fn test_parse_csv() {
        let loader = Loader::new();
        let data = b"name,age,city\nAlice,30,NYC\nBob,,LA";
        let ds = loader.parse_bytes(data, b',').unwrap();

        assert_eq!(ds.column_names(), vec!["name", "age", "city"]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.get(0, 0), Some(&CellValue::Text("Alice".to_string())));
        assert_eq!(ds.get(0, 1), Some(&CellValue::Number(30.0)));
        assert_eq!(ds.get(1, 1), Some(&CellValue::Empty));
    }

    #[test]
    fn test_parse_header_only() {
        let ds = Loader::new().parse_bytes(b"a,b\n", b',').unwrap();
        assert_eq!(ds.shape(), (0, 2));
    }

    #[test]
    fn test_parse_respects_max_rows() {
        let loader = Loader::with_config(LoaderConfig::default().with_max_rows(1));
        let ds = loader.parse_bytes(b"a\n1\n2\n3", b',').unwrap();
        assert_eq!(ds.row_count(), 1);
    }

    #[test]
    fn test_file_kind() {
        assert_eq!(file_kind(Path::new("x.XLSX")).unwrap(), FileKind::Workbook);
        assert_eq!(file_kind(Path::new("x.ods")).unwrap(), FileKind::Workbook);
        assert_eq!(file_kind(Path::new("x.tsv")).unwrap(), FileKind::Delimited);
        assert!(matches!(
            file_kind(Path::new("x.parquet")),
            Err(ProbeError::UnsupportedFormat(_))
        ));
        assert!(file_kind(Path::new("noext")).is_err());
    }
}
