//! Summary statistics and data-quality counts

mod numeric;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{CleanError, Result};
use crate::model::{CellValue, DataType, Table};

pub use numeric::{mean, median, quantile, std_dev};

/// Five-number summary plus count, mean and spread of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub q50: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    /// Summary of a sample; `None` when it is empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let (&min, &max) = (sorted.first()?, sorted.last()?);

        Some(Self {
            count: sorted.len(),
            mean: mean(&sorted)?,
            std: std_dev(&sorted),
            min,
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max,
        })
    }
}

/// Statistics of a single column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub dtype: DataType,
    pub missing: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub describe: Option<Describe>,
}

/// Statistics of a whole table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub row_count: usize,
    pub column_count: usize,
    pub total_missing: usize,
    /// Rows equal to an earlier row across all columns
    pub duplicate_rows: usize,
    /// Columns whose values equal those of an earlier column
    pub duplicate_columns: usize,
    pub columns: Vec<ColumnStats>,
}

impl StatsReport {
    /// Missing count per column, in column order
    pub fn missing_by_column(&self) -> IndexMap<&str, usize> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.missing))
            .collect()
    }
}

/// Compute the statistics report of a table
pub fn summarize(table: &Table) -> StatsReport {
    let columns: Vec<ColumnStats> = table
        .columns
        .iter()
        .enumerate()
        .map(|(col_idx, column)| {
            let missing = table.column_values(col_idx).filter(|c| c.is_null()).count();
            let describe = if column.data_type.is_numeric() {
                Describe::from_values(&table.numeric_values(col_idx))
            } else {
                None
            };

            ColumnStats {
                name: column.name.clone(),
                dtype: column.data_type,
                missing,
                mean: describe.as_ref().map(|d| d.mean),
                median: describe.as_ref().map(|d| d.q50),
                describe,
            }
        })
        .collect();

    StatsReport {
        row_count: table.row_count(),
        column_count: table.column_count(),
        total_missing: columns.iter().map(|c| c.missing).sum(),
        duplicate_rows: count_duplicate_rows(table),
        duplicate_columns: count_duplicate_columns(table),
        columns,
    }
}

fn count_duplicate_rows(table: &Table) -> usize {
    let mut seen: FxHashSet<&[CellValue]> = FxHashSet::default();
    table
        .rows
        .iter()
        .filter(|row| !seen.insert(row.cells.as_slice()))
        .count()
}

fn count_duplicate_columns(table: &Table) -> usize {
    let mut seen: FxHashSet<Vec<&CellValue>> = FxHashSet::default();
    (0..table.column_count())
        .filter(|&col_idx| !seen.insert(table.column_values(col_idx).collect()))
        .count()
}

/// Frequency of each present value of a column, most frequent first
pub fn value_counts(table: &Table, column: &str) -> Result<Vec<(String, usize)>> {
    let col_idx = table
        .column_index(column)
        .ok_or_else(|| CleanError::ColumnNotFound(column.to_string()))?;

    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for cell in table.column_values(col_idx).filter(|c| !c.is_null()) {
        *counts.entry(cell.to_field().into_owned()).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    // Stable sort keeps first-seen order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts)
}
