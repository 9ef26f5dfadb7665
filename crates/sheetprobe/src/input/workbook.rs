//! Workbook reading (xlsx, xls, xlsb, ods) through calamine.

use std::path::Path;

use calamine::{open_workbook_auto, CellErrorType, Data, Reader};

use super::cell::{parse_datetime, CellValue};
use super::source::Dataset;
use crate::error::{ProbeError, Result};

/// Sheet preferred when no sheet is requested.
const DEFAULT_SHEET: &str = "Sheet1";

/// One sheet read into a dataset.
pub(crate) struct SheetData {
    pub name: String,
    pub sheet_names: Vec<String>,
    pub dataset: Dataset,
}

/// Sheet names in workbook order.
pub(crate) fn sheet_names(path: &Path) -> Result<Vec<String>> {
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names())
}

/// Read one sheet, treating the first row of its used range as the header.
pub(crate) fn read_sheet(
    path: &Path,
    requested: Option<&str>,
    max_rows: Option<usize>,
) -> Result<SheetData> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();

    let name = select_sheet(&sheet_names, requested)?;
    log::debug!("reading sheet '{}' of {:?}", name, sheet_names);

    let range = workbook.worksheet_range(&name)?;

    // The used range starts at its first non-empty cell; blank leading
    // columns are restored so they keep their position in the header.
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    if first_row > 0 || first_col > 0 {
        log::debug!(
            "sheet '{}' data starts at row {}, column {}",
            name,
            first_row,
            first_col
        );
    }
    let leading = first_col as usize;

    let mut rows = range.rows();

    let Some(header_row) = rows.next() else {
        return Err(ProbeError::EmptyData(format!("Sheet '{}' has no header row", name)));
    };

    let headers: Vec<String> = convert_row(leading, header_row)
        .iter()
        .map(CellValue::to_string)
        .collect();

    let rows: Vec<Vec<CellValue>> = rows
        .take(max_rows.unwrap_or(usize::MAX))
        .map(|row| convert_row(leading, row))
        .collect();

    Ok(SheetData {
        name,
        sheet_names,
        dataset: Dataset::new(headers, rows),
    })
}

fn select_sheet(sheet_names: &[String], requested: Option<&str>) -> Result<String> {
    if let Some(sheet) = requested {
        return if sheet_names.iter().any(|s| s == sheet) {
            Ok(sheet.to_string())
        } else {
            Err(ProbeError::SheetNotFound {
                sheet: sheet.to_string(),
                available: sheet_names.to_vec(),
            })
        };
    }

    if sheet_names.iter().any(|s| s == DEFAULT_SHEET) {
        return Ok(DEFAULT_SHEET.to_string());
    }

    sheet_names
        .first()
        .cloned()
        .ok_or_else(|| ProbeError::EmptyData("Workbook has no sheets".to_string()))
}

/// Convert a range row, prefixed with `leading` empty cells.
fn convert_row(leading: usize, row: &[Data]) -> Vec<CellValue> {
    std::iter::repeat_n(CellValue::Empty, leading)
        .chain(row.iter().map(convert_cell))
        .collect()
}

fn convert_cell(value: &Data) -> CellValue {
    match value {
        Data::Empty => CellValue::Empty,
        Data::Bool(v) => CellValue::Bool(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::String(v) => CellValue::Text(v.clone()),
        Data::Error(e) => CellValue::Error(error_text(e)),
        // Durations such as `[h]:mm` stay as day counts.
        Data::DateTime(v) if v.is_duration() => CellValue::Number(v.as_f64()),
        Data::DateTime(v) => v
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(v.as_f64())),
        Data::DateTimeIso(v) => parse_datetime(v)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(v.clone())),
        Data::DurationIso(v) => CellValue::Text(v.clone()),
    }
}

fn error_text(err: &CellErrorType) -> String {
    match err {
        CellErrorType::Div0 => "#DIV/0!",
        CellErrorType::NA => "#N/A",
        CellErrorType::Name => "#NAME?",
        CellErrorType::Null => "#NULL!",
        CellErrorType::Num => "#NUM!",
        CellErrorType::Ref => "#REF!",
        CellErrorType::Value => "#VALUE!",
        CellErrorType::GettingData => "#DATA!",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> CellValue {
        let day = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        CellValue::DateTime(day.and_hms_opt(0, 0, 0).unwrap())
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_prefers_sheet1() {
        let sheets = names(&["Summary", "Sheet1"]);
        assert_eq!(select_sheet(&sheets, None).unwrap(), "Sheet1");
    }

    #[test]
    fn test_select_falls_back_to_first() {
        let sheets = names(&["Stores", "Managers"]);
        assert_eq!(select_sheet(&sheets, None).unwrap(), "Stores");
    }

    #[test]
    fn test_select_requested() {
        let sheets = names(&["Stores", "Managers"]);
        assert_eq!(select_sheet(&sheets, Some("Managers")).unwrap(), "Managers");

        let err = select_sheet(&sheets, Some("Regions")).unwrap_err();
        match err {
            ProbeError::SheetNotFound { sheet, available } => {
                assert_eq!(sheet, "Regions");
                assert_eq!(available, sheets);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_select_empty_workbook() {
        assert!(matches!(select_sheet(&[], None), Err(ProbeError::EmptyData(_))));
    }

    #[test]
    fn test_convert_cell() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(convert_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(
            convert_cell(&Data::String(String::new())),
            CellValue::Text(String::new())
        );
        assert_eq!(
            convert_cell(&Data::Error(CellErrorType::Div0)),
            CellValue::Error("#DIV/0!".to_string())
        );
        assert!(matches!(
            convert_cell(&Data::DateTimeIso("2024-05-06".to_string())),
            CellValue::DateTime(_)
        ));
    }

    #[test]
    fn test_convert_dates_by_date_system() {
        let modern = ExcelDateTime::new(45292.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(convert_cell(&Data::DateTime(modern)), date(2024, 1, 1));

        let epoch_1904 = ExcelDateTime::new(0.0, ExcelDateTimeType::DateTime, true);
        assert_eq!(convert_cell(&Data::DateTime(epoch_1904)), date(1904, 1, 1));
    }

    #[test]
    fn test_convert_duration_stays_numeric() {
        let elapsed = ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false);
        assert_eq!(convert_cell(&Data::DateTime(elapsed)), CellValue::Number(1.5));
    }

    #[test]
    fn test_convert_row_restores_leading_columns() {
        let row = vec![Data::String("store".to_string()), Data::Int(1)];

        assert_eq!(
            convert_row(1, &row),
            vec![
                CellValue::Empty,
                CellValue::Text("store".to_string()),
                CellValue::Number(1.0),
            ]
        );
        assert_eq!(convert_row(0, &row).len(), 2);
    }
}
