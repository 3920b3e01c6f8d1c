//! Tabular terminal output

use std::io::Write;

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::clean::{ImputeReport, OutlierReport};
use crate::error::Result;
use crate::model::Table;
use crate::stats::StatsReport;

use super::OutputFormatter;

/// Terminal output with box-drawn tables
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_counts(&self, report: &StatsReport, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "Rows:              {}", report.row_count)?;
        writeln!(writer, "Columns:           {}", report.column_count)?;
        writeln!(writer, "Missing values:    {}", report.total_missing)?;
        writeln!(writer, "Duplicate rows:    {}", report.duplicate_rows)?;
        writeln!(writer, "Duplicate columns: {}", report.duplicate_columns)?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_columns(&self, report: &StatsReport, writer: &mut dyn Write) -> Result<()> {
        let mut builder = Builder::default();
        builder.push_record(
            [
                "column", "dtype", "missing", "count", "mean", "std", "min", "25%", "50%", "75%",
                "max",
            ]
            .map(String::from),
        );

        for column in &report.columns {
            let mut record = vec![
                column.name.clone(),
                column.dtype.to_string(),
                column.missing.to_string(),
            ];
            match &column.describe {
                Some(d) => {
                    record.push(d.count.to_string());
                    record.push(number(d.mean));
                    record.push(d.std.map(number).unwrap_or_else(|| "NaN".to_string()));
                    for v in [d.min, d.q25, d.q50, d.q75, d.max] {
                        record.push(number(v));
                    }
                }
                None => record.extend(std::iter::repeat(String::new()).take(8)),
            }
            builder.push_record(record);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        writeln!(writer, "{}", table)?;
        Ok(())
    }

    /// Print the rows of a table, e.g. a head or tail preview
    pub fn write_rows(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let mut builder = Builder::default();
        builder.push_record(table.columns.iter().map(|c| c.name.clone()));
        for row in &table.rows {
            builder.push_record(row.cells.iter().map(|c| c.display().into_owned()));
        }

        let mut rendered = builder.build();
        rendered.with(Style::modern());
        writeln!(writer, "{}", rendered)?;
        Ok(())
    }

    /// Summarize what outlier removal did
    pub fn write_outliers(&self, report: &OutlierReport, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "Outlier rows removed: {}", report.rows_removed)?;
        for (column, count) in &report.per_column {
            if let Some(bounds) = report.bounds.get(column) {
                writeln!(
                    writer,
                    "  {}: {} outside [{}, {}]",
                    column,
                    count,
                    number(bounds.lower),
                    number(bounds.upper)
                )?;
            }
        }
        writeln!(writer)?;
        Ok(())
    }

    /// Summarize what imputation did
    pub fn write_imputation(&self, report: &ImputeReport, writer: &mut dyn Write) -> Result<()> {
        if report.rows_removed > 0 {
            writeln!(writer, "Rows with missing values removed: {}", report.rows_removed)?;
        }
        for (column, count) in &report.filled {
            writeln!(writer, "  {}: {} filled", column, count)?;
        }
        for (column, count) in &report.unresolved {
            writeln!(writer, "  {}: {} missing left (non-numeric)", column, count)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(&self, report: &StatsReport, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "Statistics")?;
        writeln!(writer, "━━━━━━━━━━")?;
        self.write_counts(report, writer)?;

        if report.columns.is_empty() {
            writeln!(writer, "No columns.")?;
            return Ok(());
        }

        self.write_columns(report, writer)
    }
}

fn number(v: f64) -> String {
    let rounded = format!("{:.4}", v);
    rounded
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
