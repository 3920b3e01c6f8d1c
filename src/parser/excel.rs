//! Excel file parser (xlsx, xls)

use std::borrow::Cow;
use std::io::Cursor;

use calamine::{Data, Range, Reader, Xls, Xlsx};
use chrono::Timelike;

use crate::error::{CleanError, Result};
use crate::model::{CellValue, Column, Table};

use super::{unique_headers, Parser};

/// Parser for Excel files; the first sheet is read and its first row is the header
pub struct ExcelParser;

type Source = Cursor<Vec<u8>>;

impl Parser for ExcelParser {
    fn parse(&self, bytes: &[u8]) -> Result<Table> {
        let source = Cursor::new(bytes.to_vec());

        // Sniff the container instead of trusting the extension: an
        // Office Open XML package is a zip archive.
        let range = if bytes.starts_with(b"PK\x03\x04") {
            first_sheet(Xlsx::<Source>::new(source)?)?
        } else {
            first_sheet(Xls::<Source>::new(source)?)?
        };

        parse_range(range)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls")
    }
}

fn first_sheet<R>(mut workbook: R) -> Result<Range<Data>>
where
    R: Reader<Source>,
    CleanError: From<R::Error>,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CleanError::Spreadsheet("No sheets found in workbook".to_string()))?;

    Ok(workbook.worksheet_range(&sheet_name)?)
}

fn parse_range(range: Range<Data>) -> Result<Table> {
    let (_, col_count) = range.get_size();

    // First row is header
    let header_row = match range.rows().next() {
        Some(row) if row.iter().any(|c| !matches!(c, Data::Empty)) => row,
        _ => return Err(CleanError::EmptyInput),
    };

    let columns: Vec<Column> = unique_headers(header_row.iter().map(cell_to_string))
        .into_iter()
        .map(Column::new)
        .collect();

    let mut table = Table::new(columns);

    // Read data rows
    for (line_num, row) in range.rows().skip(1).enumerate() {
        let cells: Vec<CellValue> = row.iter().take(col_count).map(convert_cell).collect();
        table.add_row(cells, line_num + 2); // +2 for 1-indexing and header
    }

    table.infer_column_types();
    Ok(table)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => datetime.to_string(),
            None => dt.to_string(),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if super::is_missing_token(s) {
                CellValue::Null
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::Float(f) => {
            // Check if it's actually an integer
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if datetime.num_seconds_from_midnight() == 0 && datetime.nanosecond() == 0 => {
                CellValue::Date(datetime.date())
            }
            Some(datetime) => CellValue::DateTime(datetime),
            None => CellValue::String(Cow::Owned(dt.to_string())),
        },
        Data::DateTimeIso(s) => {
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                CellValue::DateTime(dt)
            } else if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                CellValue::Date(d)
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::DurationIso(s) => CellValue::String(Cow::Owned(s.clone())),
        Data::Error(_) => CellValue::Null,
    }
}
