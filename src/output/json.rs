//! JSON output format

use std::io::Write;

use crate::error::{CleanError, Result};
use crate::stats::StatsReport;

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn render(&self, report: &StatsReport, writer: &mut dyn Write) -> Result<()> {
        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, report)
        } else {
            serde_json::to_writer(&mut *writer, report)
        };
        written.map_err(|e| CleanError::Io(e.into()))?;
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Column, Table};
    use crate::stats::summarize;

    #[test]
    fn test_json_report_fields() {
        let mut table = Table::new(vec![Column::new("x")]);
        table.add_row(vec![CellValue::Int(1)], 2);
        table.add_row(vec![CellValue::Null], 3);
        table.infer_column_types();

        let mut buffer = Vec::new();
        JsonOutput::compact()
            .render(&summarize(&table), &mut buffer)
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["row_count"], 2);
        assert_eq!(value["total_missing"], 1);
        assert_eq!(value["columns"][0]["dtype"], "numeric");
        assert_eq!(value["columns"][0]["describe"]["50%"], 1.0);
    }
}
