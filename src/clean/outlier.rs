//! IQR-based outlier removal

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::model::Table;
use crate::stats::quantile;

/// Tukey fence multiplier
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Acceptance interval of one numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    /// Fences from a sorted sample; `None` when the sample is empty
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        if sorted.is_empty() {
            return None;
        }
        let q1 = quantile(sorted, 0.25);
        let q3 = quantile(sorted, 0.75);
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - IQR_MULTIPLIER * iqr,
            upper: q3 + IQR_MULTIPLIER * iqr,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// What an outlier pass removed, for display
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutlierReport {
    /// Rows dropped because at least one numeric value was out of bounds
    pub rows_removed: usize,
    /// Values of each numeric column outside that column's own bounds
    pub per_column: IndexMap<String, usize>,
    /// Bounds computed for each numeric column
    pub bounds: IndexMap<String, Bounds>,
}

/// Drop every row holding a value outside its column's IQR fences.
///
/// Only numeric columns take part. Missing cells never flag a row, and a table
/// without numeric columns is returned unchanged.
pub fn remove_outliers(table: &Table) -> (Table, OutlierReport) {
    let mut report = OutlierReport::default();
    let mut fences: Vec<(usize, Bounds)> = Vec::new();

    for col_idx in table.numeric_columns() {
        let mut values = table.numeric_values(col_idx);
        values.sort_by(f64::total_cmp);

        if let Some(bounds) = Bounds::from_sorted(&values) {
            let name = table.columns[col_idx].name.clone();
            let outside = values.iter().filter(|v| !bounds.contains(**v)).count();
            debug!(column = %name, lower = bounds.lower, upper = bounds.upper, outside, "outlier fences");

            report.per_column.insert(name.clone(), outside);
            report.bounds.insert(name, bounds);
            fences.push((col_idx, bounds));
        }
    }

    let mut result = table.clone();
    if fences.is_empty() {
        return (result, report);
    }

    result.retain_rows(|_, row| {
        fences.iter().all(|(col_idx, bounds)| {
            row.get(*col_idx)
                .and_then(|c| c.as_f64())
                .map_or(true, |v| bounds.contains(v))
        })
    });

    report.rows_removed = table.row_count() - result.row_count();
    (result, report)
}
