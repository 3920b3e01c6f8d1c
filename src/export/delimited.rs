//! CSV and tab-separated output

use std::borrow::Cow;

use crate::error::{CleanError, Result};
use crate::model::{CellValue, Table};

use super::Exporter;

/// Writes a header line then one line per row, without a row index
pub struct DelimitedExporter {
    delimiter: u8,
    /// Text written for a missing cell
    missing: &'static str,
}

impl DelimitedExporter {
    pub fn new(delimiter: u8, missing: &'static str) -> Self {
        Self { delimiter, missing }
    }

    /// Comma-separated values; missing cells are empty fields
    pub fn csv() -> Self {
        Self::new(b',', "")
    }

    /// Tab-separated values; missing cells are `NaN` so that whitespace
    /// splitting on reload keeps every field in its column
    pub fn tab() -> Self {
        Self::new(b'\t', "NaN")
    }

    fn field<'a>(&self, cell: &'a CellValue) -> Cow<'a, str> {
        if cell.is_null() {
            Cow::Borrowed(self.missing)
        } else {
            cell.to_field()
        }
    }
}

impl Exporter for DelimitedExporter {
    fn export(&self, table: &Table) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        // A `;` in a comma-separated header would make the loader sniff `;`
        if self.delimiter == b',' {
            if let Some(column) = table.columns.iter().find(|c| c.name.contains(';')) {
                return Err(CleanError::InvalidParameter(format!(
                    "column name '{}' contains ';', which cannot be exported as CSV",
                    column.name
                )));
            }
        }

        writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
        for row in &table.rows {
            writer.write_record(row.cells.iter().map(|c| self.field(c).into_owned()))?;
        }

        writer
            .into_inner()
            .map_err(|e| CleanError::Io(e.into_error()))
    }
}
