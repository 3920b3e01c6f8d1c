//! CSV file parser

use tracing::{debug, info, warn};

use crate::error::{CleanError, Result};
use crate::model::{CellValue, Column, Table};

use super::{first_line, parse_cell_value, strip_bom, unique_headers, Parser};

/// Parser for CSV files, sniffing `;` or `,` from the header line
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse(&self, bytes: &[u8]) -> Result<Table> {
        let bytes = strip_bom(bytes);
        let delimiter = sniff_delimiter(first_line(bytes));
        debug!(delimiter = %(delimiter as char), "sniffed CSV delimiter");

        parse_delimited(
            bytes,
            &DelimitedOptions {
                delimiter,
                ..Default::default()
            },
        )
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("csv")
    }
}

/// `;` if the header line contains one, `,` otherwise
pub fn sniff_delimiter(header_line: &[u8]) -> u8 {
    if header_line.contains(&b';') {
        b';'
    } else {
        b','
    }
}

/// Settings for reading a delimited body
#[derive(Debug, Clone)]
pub struct DelimitedOptions {
    /// Field separator
    pub delimiter: u8,
    /// Read `,` as the decimal separator in numbers
    pub decimal_comma: bool,
    /// Skip rows that fail to parse or whose width differs from the header
    pub skip_malformed: bool,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            decimal_comma: false,
            skip_malformed: false,
        }
    }
}

/// Read a delimited body with a header line into a Table
pub fn parse_delimited(bytes: &[u8], options: &DelimitedOptions) -> Result<Table> {
    let bytes = strip_bom(bytes);
    if first_line(bytes).iter().all(u8::is_ascii_whitespace) {
        return Err(CleanError::EmptyInput);
    }

    // The whole body is read from the start with the chosen delimiter
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .flexible(!options.skip_malformed)
        .from_reader(bytes);

    let headers = csv_reader.headers()?.clone();
    let columns: Vec<Column> = unique_headers(headers.iter())
        .into_iter()
        .map(Column::new)
        .collect();

    let mut table = Table::new(columns);
    let mut skipped_rows = 0usize;

    for (line_num, result) in csv_reader.records().enumerate() {
        let source_line = line_num + 2; // +2 for 1-indexing and header
        let record = match result {
            Ok(record) => record,
            Err(e) if options.skip_malformed => {
                skipped_rows += 1;
                warn!("Skipping malformed row {}: {}", source_line, e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        // Short rows are padded; extra fields have no column to go to
        if record.len() > table.column_count() {
            return Err(CleanError::MalformedRow {
                line: source_line,
                expected: table.column_count(),
                found: record.len(),
            });
        }

        let cells: Vec<CellValue> = record
            .iter()
            .map(|s| parse_cell_value(s, options.decimal_comma))
            .collect();

        table.add_row(cells, source_line);
    }

    if skipped_rows > 0 {
        info!(
            "Parsing complete: {} rows parsed, {} rows skipped due to errors",
            table.row_count(),
            skipped_rows
        );
    }

    table.infer_column_types();
    Ok(table)
}
