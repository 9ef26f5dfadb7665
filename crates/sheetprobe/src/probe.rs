//! Main Probe struct and public API.

use std::path::Path;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::error::{ProbeError, Result};
use crate::input::{CellValue, Dataset, Loader, LoaderConfig, SourceMetadata};
use crate::profile::{summarize_with, ColumnSummary, SummaryOptions};
use crate::schema::ColumnType;

/// Title of the group used when no groups are requested.
pub const ALL_COLUMNS_TITLE: &str = "All Columns";

/// Configuration for a probe run.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Loader configuration.
    pub loader: LoaderConfig,
    /// Summary options.
    pub summary: SummaryOptions,
    /// Number of leading rows to include in the preview.
    pub head_rows: usize,
    /// Number of placeholder rows listed in the report.
    pub placeholder_rows: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            summary: SummaryOptions::default(),
            head_rows: 10,
            placeholder_rows: 3,
        }
    }
}

/// A titled list of columns to summarize together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGroup {
    pub title: String,
    pub columns: Vec<String>,
}

impl ColumnGroup {
    pub fn new<S: Into<String>>(
        title: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            title: title.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromStr for ColumnGroup {
    type Err = ProbeError;

    /// Parse `Title=col_a,col_b`.
    fn from_str(s: &str) -> Result<Self> {
        let (title, columns) = s.split_once('=').ok_or_else(|| {
            ProbeError::Config(format!("group '{}' must look like Title=col_a,col_b", s))
        })?;

        let title = title.trim();
        if title.is_empty() {
            return Err(ProbeError::Config(format!("group '{}' has no title", s)));
        }

        let columns: Vec<String> = columns
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect();

        Ok(Self::new(title, columns))
    }
}

/// One summarized column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnReport {
    pub name: String,
    pub dtype: ColumnType,
    #[serde(flatten)]
    pub summary: ColumnSummary,
}

/// Summaries for one column group, in requested order.
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub title: String,
    pub columns: Vec<ColumnReport>,
}

/// Rows with a placeholder value in any summarized column.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceholderRows {
    /// Number of matching rows in the dataset.
    pub count: usize,
    /// Summarized columns, in first-requested order.
    pub columns: Vec<String>,
    /// Leading matching rows, restricted to `columns`.
    pub rows: Vec<Vec<CellValue>>,
}

/// Everything a probe run reports about a file.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// (rows, columns).
    pub shape: (usize, usize),
    /// Column names in header order.
    pub columns: Vec<String>,
    /// Inferred type of every column.
    pub dtypes: IndexMap<String, ColumnType>,
    /// Leading rows, row-major.
    pub preview: Vec<Vec<CellValue>>,
    /// Column summaries by group.
    pub groups: Vec<GroupReport>,
    /// Present only when placeholder words are configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_rows: Option<PlaceholderRows>,
}

/// Loads a file once and reports on it.
pub struct Probe {
    config: ProbeConfig,
    loader: Loader,
}

impl Probe {
    /// Create a probe with default configuration.
    pub fn new() -> Self {
        Self::with_config(ProbeConfig::default())
    }

    /// Create a probe with custom configuration.
    pub fn with_config(config: ProbeConfig) -> Self {
        let loader = Loader::with_config(config.loader.clone());
        Self { config, loader }
    }

    /// Load the file without reporting on it.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        self.loader.load(path)
    }

    /// List the sheets in a file.
    pub fn sheet_names(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        self.loader.sheet_names(path)
    }

    /// Load a file and build the full report.
    ///
    /// With no groups, every column is summarized under one group.
    pub fn run(&self, path: impl AsRef<Path>, groups: &[ColumnGroup]) -> Result<ProbeReport> {
        let (dataset, source) = self.load(path)?;
        Ok(self.report(&dataset, source, groups))
    }

    /// Build the report for an already loaded dataset.
    pub fn report(
        &self,
        dataset: &Dataset,
        source: SourceMetadata,
        groups: &[ColumnGroup],
    ) -> ProbeReport {
        let dtypes: IndexMap<String, ColumnType> = dataset
            .columns()
            .map(|(name, column)| (name.to_string(), ColumnType::infer(column)))
            .collect();

        let default_group;
        let groups = if groups.is_empty() {
            default_group = [ColumnGroup::new(ALL_COLUMNS_TITLE, dataset.column_names())];
            &default_group[..]
        } else {
            groups
        };

        let groups: Vec<GroupReport> = groups
            .iter()
            .map(|group| GroupReport {
                title: group.title.clone(),
                columns: summarize_with(dataset, group.columns.as_slice(), &self.config.summary)
                    .into_iter()
                    .map(|(name, summary)| ColumnReport {
                        dtype: dtypes.get(&name).copied().unwrap_or(ColumnType::Empty),
                        name,
                        summary,
                    })
                    .collect(),
            })
            .collect();

        let placeholder_rows = self.placeholder_rows(dataset, &groups);

        ProbeReport {
            source,
            shape: dataset.shape(),
            columns: dataset.column_names().into_iter().map(String::from).collect(),
            dtypes,
            preview: dataset.head(self.config.head_rows),
            groups,
            placeholder_rows,
        }
    }

    fn placeholder_rows(
        &self,
        dataset: &Dataset,
        groups: &[GroupReport],
    ) -> Option<PlaceholderRows> {
        let options = &self.config.summary;
        if options.placeholders.is_empty() {
            return None;
        }

        let names: IndexSet<&str> = groups
            .iter()
            .flat_map(|group| group.columns.iter().map(|c| c.name.as_str()))
            .collect();
        let columns: Vec<(&str, &[CellValue])> = names
            .into_iter()
            .filter_map(|name| dataset.column(name).map(|column| (name, column.values())))
            .collect();

        let mut count = 0;
        let mut rows = Vec::new();
        for row in 0..dataset.row_count() {
            if !columns.iter().any(|(_, values)| options.is_placeholder(&values[row])) {
                continue;
            }
            count += 1;
            if rows.len() < self.config.placeholder_rows {
                rows.push(columns.iter().map(|(_, values)| values[row].clone()).collect());
            }
        }

        log::debug!("{} rows hold a placeholder value", count);

        Some(PlaceholderRows {
            count,
            columns: columns.iter().map(|(name, _)| name.to_string()).collect(),
            rows,
        })
    }
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group() {
        let group: ColumnGroup = "Area Managers=am_username, am_email".parse().unwrap();
        assert_eq!(group.title, "Area Managers");
        assert_eq!(group.columns, vec!["am_username", "am_email"]);
    }

    #[test]
    fn test_parse_group_errors() {
        assert!(matches!(
            "am_username".parse::<ColumnGroup>(),
            Err(ProbeError::Config(_))
        ));
        assert!(matches!("=a,b".parse::<ColumnGroup>(), Err(ProbeError::Config(_))));
    }

    #[test]
    fn test_parse_group_allows_empty_list() {
        let group: ColumnGroup = "Nothing=".parse().unwrap();
        assert!(group.columns.is_empty());
    }
}
