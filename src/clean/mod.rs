//! Cleaning operations over tables
//!
//! Every operation takes a table by reference and returns a new one, so a
//! rejected step leaves the caller's table in its last valid state.

pub mod coerce;
pub mod impute;
pub mod outlier;
pub mod schema;

use tracing::{debug, info};

use crate::config::CleaningParameters;
use crate::error::Result;
use crate::model::Table;

pub use coerce::coerce_types;
pub use impute::{impute, ImputeReport};
pub use outlier::{remove_outliers, Bounds, OutlierReport};
pub use schema::{
    add_column, drop_columns, drop_columns_strict, drop_row_range, drop_rows, drop_rows_strict,
    rename_columns, row_range,
};

/// Result of running the pipeline
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    /// The cleaned table
    pub table: Table,
    /// Positions removed by the range deletion, relative to the table it was applied to
    pub removed_range: Vec<usize>,
    /// Present when outlier removal ran
    pub outliers: Option<OutlierReport>,
    /// Present when imputation ran
    pub imputation: Option<ImputeReport>,
}

/// Applies a set of cleaning parameters in a fixed order
pub struct CleaningPipeline {
    params: CleaningParameters,
}

impl CleaningPipeline {
    /// Create a new pipeline with parameters
    pub fn new(params: CleaningParameters) -> Self {
        Self { params }
    }

    /// Run every selected step.
    ///
    /// Order: drop columns, drop rows, drop range, rename, coerce, outliers, impute.
    /// Empty selections are skipped rather than rejected.
    pub fn run(&self, table: &Table) -> Result<CleaningOutcome> {
        let params = &self.params;
        let rows_before = table.row_count();
        let mut current = table.clone();

        if !params.drop_columns.is_empty() {
            current = drop_columns(&current, &params.drop_columns)?;
            debug!(columns = current.column_count(), "dropped columns");
        }

        if !params.drop_rows.is_empty() {
            current = drop_rows(&current, &params.drop_rows)?;
            debug!(rows = current.row_count(), "dropped rows");
        }

        let mut removed_range = Vec::new();
        if let Some(range) = params.drop_range {
            removed_range = row_range(current.row_count(), range.mode, range.count).collect();
            current = drop_row_range(&current, range.mode, range.count);
            debug!(rows = current.row_count(), "dropped row range");
        }

        if !params.rename_map.is_empty() {
            current = rename_columns(&current, &params.rename_map)?;
        }

        if !params.type_coercions.is_empty() {
            current = coerce_types(&current, &params.type_coercions)?;
        }

        let mut outliers = None;
        if params.remove_outliers {
            let (cleaned, report) = remove_outliers(&current);
            debug!(removed = report.rows_removed, "removed outliers");
            current = cleaned;
            outliers = Some(report);
        }

        let mut imputation = None;
        if let Some(method) = params.imputation_method {
            let (cleaned, report) = impute(&current, method);
            debug!(?method, removed = report.rows_removed, "imputed missing values");
            current = cleaned;
            imputation = Some(report);
        }

        info!(
            rows_before,
            rows_after = current.row_count(),
            columns = current.column_count(),
            "cleaning complete"
        );

        Ok(CleaningOutcome {
            table: current,
            removed_range,
            outliers,
            imputation,
        })
    }
}

/// Convenience function to run the pipeline once
pub fn apply_cleaning(table: &Table, params: &CleaningParameters) -> Result<CleaningOutcome> {
    CleaningPipeline::new(params.clone()).run(table)
}
