//! Missing-value resolution

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::ImputationMethod;
use crate::model::{CellValue, DataType, Table};
use crate::stats::{mean, median};

/// What an imputation pass changed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImputeReport {
    /// Rows dropped by [`ImputationMethod::Drop`]
    pub rows_removed: usize,
    /// Cells filled per column
    pub filled: IndexMap<String, usize>,
    /// Missing cells left in place per column (non-numeric or all-missing columns)
    pub unresolved: IndexMap<String, usize>,
}

/// Resolve missing values with the chosen method.
///
/// Filling only touches numeric columns; missing cells of other columns are
/// left as they are and counted as unresolved. Present values are never
/// overwritten, so a second pass is a no-op.
pub fn impute(table: &Table, method: ImputationMethod) -> (Table, ImputeReport) {
    let mut report = ImputeReport::default();
    let mut result = table.clone();

    let statistic: fn(&[f64]) -> Option<f64> = match method {
        ImputationMethod::Drop => {
            result.retain_rows(|_, row| !row.has_missing());
            report.rows_removed = table.row_count() - result.row_count();
            return (result, report);
        }
        ImputationMethod::FillMedian => median,
        ImputationMethod::FillMean => mean,
    };

    for col_idx in 0..result.column_count() {
        let missing = result.column_values(col_idx).filter(|c| c.is_null()).count();
        if missing == 0 {
            continue;
        }

        let column = &result.columns[col_idx];
        let name = column.name.clone();
        let fill = if column.data_type.is_numeric() {
            statistic(&result.numeric_values(col_idx))
        } else {
            None
        };

        let Some(fill) = fill else {
            report.unresolved.insert(name, missing);
            continue;
        };

        let integral_column = result
            .column_values(col_idx)
            .all(|c| matches!(c, CellValue::Null | CellValue::Int(_)));
        let fill_value = if integral_column && fill.fract() == 0.0 {
            CellValue::Int(fill as i64)
        } else {
            if result.columns[col_idx].data_type == DataType::Integer {
                result.columns[col_idx].data_type = DataType::Numeric;
            }
            CellValue::Float(fill)
        };

        for row in &mut result.rows {
            if row.cells[col_idx].is_null() {
                row.cells[col_idx] = fill_value.clone();
            }
        }
        report.filled.insert(name, missing);
    }

    (result, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn sample() -> Table {
        let mut table = Table::new(vec![Column::new("x"), Column::new("y"), Column::new("s")]);
        table.add_row(vec![CellValue::Int(1), CellValue::Float(1.0), CellValue::from("a")], 2);
        table.add_row(vec![CellValue::Null, CellValue::Float(2.0), CellValue::Null], 3);
        table.add_row(vec![CellValue::Int(4), CellValue::Null, CellValue::from("c")], 4);
        table.add_row(vec![CellValue::Int(10), CellValue::Float(6.0), CellValue::from("d")], 5);
        table.infer_column_types();
        table
    }

    #[test]
    fn test_drop_rows_with_missing() {
        let (result, report) = impute(&sample(), ImputationMethod::Drop);
        assert_eq!(result.row_count(), 2);
        assert_eq!(report.rows_removed, 2);
        assert!(result.rows.iter().all(|r| !r.has_missing()));
    }

    #[test]
    fn test_fill_mean() {
        let (result, report) = impute(&sample(), ImputationMethod::FillMean);

        assert_eq!(result.row_count(), 4);
        assert_eq!(result.rows[1].cells[0], CellValue::Int(5));
        assert_eq!(result.rows[2].cells[1], CellValue::Float(3.0));
        // Non-numeric column stays unresolved
        assert_eq!(result.rows[1].cells[2], CellValue::Null);
        assert_eq!(report.filled["x"], 1);
        assert_eq!(report.unresolved["s"], 1);
    }

    #[test]
    fn test_fill_median_keeps_present_values() {
        let table = sample();
        let (result, _) = impute(&table, ImputationMethod::FillMedian);

        assert_eq!(result.rows[1].cells[0], CellValue::Int(4));
        assert_eq!(result.rows[2].cells[1], CellValue::Float(2.0));
        for (before, after) in table.rows.iter().zip(&result.rows) {
            for (b, a) in before.cells.iter().zip(&after.cells) {
                if !b.is_null() {
                    assert_eq!(b, a);
                }
            }
        }
    }

    #[test]
    fn test_fill_is_idempotent() {
        let (once, _) = impute(&sample(), ImputationMethod::FillMean);
        let (twice, report) = impute(&once, ImputationMethod::FillMean);

        assert_eq!(once, twice);
        assert!(report.filled.is_empty());
    }

    #[test]
    fn test_all_missing_numeric_column_is_unresolved() {
        let mut table = Table::new(vec![Column::new("empty")]);
        table.add_row(vec![CellValue::Null], 2);
        table.infer_column_types();

        let (result, report) = impute(&table, ImputationMethod::FillMedian);
        assert_eq!(result, table);
        assert_eq!(report.unresolved["empty"], 1);
    }
}
