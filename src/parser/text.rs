//! Whitespace-delimited text parser

use std::io;

use crate::error::{CleanError, Result};
use crate::model::{CellValue, Column, Table};

use super::{parse_cell_value, strip_bom, unique_headers, Parser};

/// Parser for `.txt` files whose fields are separated by runs of whitespace
pub struct TextParser;

impl Parser for TextParser {
    fn parse(&self, bytes: &[u8]) -> Result<Table> {
        let content = std::str::from_utf8(strip_bom(bytes))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut lines = content.lines().enumerate();

        let header = match lines.next() {
            Some((_, line)) if !line.trim().is_empty() => line,
            _ => return Err(CleanError::EmptyInput),
        };

        let columns: Vec<Column> = unique_headers(header.split_whitespace())
            .into_iter()
            .map(Column::new)
            .collect();
        let mut table = Table::new(columns);

        for (line_idx, line) in lines {
            if line.trim().is_empty() {
                continue;
            }

            let cells: Vec<CellValue> = line
                .split_whitespace()
                .map(|field| parse_cell_value(field, false))
                .collect();

            if cells.len() > table.column_count() {
                return Err(CleanError::MalformedRow {
                    line: line_idx + 1,
                    expected: table.column_count(),
                    found: cells.len(),
                });
            }

            table.add_row(cells, line_idx + 1);
        }

        table.infer_column_types();
        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("txt")
    }
}
