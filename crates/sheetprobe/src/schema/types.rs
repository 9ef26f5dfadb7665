//! Inferred data types for columns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input::{CellValue, Column};

/// Inferred data type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers (no fractional part).
    Integer,
    /// Floating-point numbers.
    Float,
    /// Text/string values.
    Text,
    /// Boolean values (true/false).
    Boolean,
    /// Date and/or time values.
    DateTime,
    /// More than one kind of value, or error cells.
    Mixed,
    /// No recorded values at all.
    Empty,
}

impl ColumnType {
    /// Infer the type from a column's non-missing cells.
    pub fn infer(column: &Column) -> Self {
        let mut inferred: Option<ColumnType> = None;

        for value in column.present() {
            let kind = match value {
                CellValue::Number(n) if n.fract() == 0.0 => ColumnType::Integer,
                CellValue::Number(_) => ColumnType::Float,
                CellValue::Text(_) => ColumnType::Text,
                CellValue::Bool(_) => ColumnType::Boolean,
                CellValue::DateTime(_) => ColumnType::DateTime,
                CellValue::Error(_) => return ColumnType::Mixed,
                CellValue::Empty => continue,
            };

            inferred = Some(match (inferred, kind) {
                (None, k) => k,
                (Some(a), b) if a == b => a,
                (Some(ColumnType::Integer), ColumnType::Float)
                | (Some(ColumnType::Float), ColumnType::Integer) => ColumnType::Float,
                _ => return ColumnType::Mixed,
            });
        }

        inferred.unwrap_or(ColumnType::Empty)
    }

    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
            ColumnType::DateTime => "datetime",
            ColumnType::Mixed => "mixed",
            ColumnType::Empty => "empty",
        };
        f.write_str(name)
    }
}
