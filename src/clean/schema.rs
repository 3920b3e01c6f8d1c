//! Column and row elimination, renaming

use std::ops::Range;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::config::RangeMode;
use crate::error::{CleanError, Result};
use crate::model::{CellValue, Column, Table};

/// Remove the named columns. Names not present in the table are ignored.
pub fn drop_columns<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<Table> {
    if names.is_empty() {
        return Err(CleanError::InvalidParameter(
            "no column selected for removal".to_string(),
        ));
    }

    let drop: FxHashSet<&str> = names.iter().map(S::as_ref).collect();
    let keep: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| !drop.contains(c.name.as_str()))
        .map(|(i, _)| i)
        .collect();

    Ok(project_columns(table, &keep))
}

/// Like [`drop_columns`], but every name must exist
pub fn drop_columns_strict<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<Table> {
    for name in names {
        let name: &str = name.as_ref();
        if table.column_index(name).is_none() {
            return Err(CleanError::ColumnNotFound(name.to_string()));
        }
    }
    drop_columns(table, names)
}

fn project_columns(table: &Table, keep: &[usize]) -> Table {
    let columns = keep.iter().map(|&i| table.columns[i].clone()).collect();
    let mut projected = Table::new(columns);

    for row in &table.rows {
        let cells = keep
            .iter()
            .map(|&i| row.get(i).cloned().unwrap_or(CellValue::Null))
            .collect();
        projected.add_row(cells, row.source_line);
    }

    projected
}

/// Remove rows by position. Positions past the end are ignored.
pub fn drop_rows(table: &Table, row_indices: &[usize]) -> Result<Table> {
    if row_indices.is_empty() {
        return Err(CleanError::InvalidParameter(
            "no row selected for removal".to_string(),
        ));
    }

    let drop: FxHashSet<usize> = row_indices.iter().copied().collect();
    let mut result = table.clone();
    result.retain_rows(|idx, _| !drop.contains(&idx));
    Ok(result)
}

/// Like [`drop_rows`], but every position must be within the table
pub fn drop_rows_strict(table: &Table, row_indices: &[usize]) -> Result<Table> {
    let row_count = table.row_count();
    if let Some(&index) = row_indices.iter().find(|&&i| i >= row_count) {
        return Err(CleanError::IndexRange { index, row_count });
    }
    drop_rows(table, row_indices)
}

/// Positions removed by a range deletion over `row_count` rows.
///
/// `count` is clamped to the row count. The middle window starts at
/// `row_count / 2 - count / 2`.
pub fn row_range(row_count: usize, mode: RangeMode, count: usize) -> Range<usize> {
    let count = count.min(row_count);
    match mode {
        RangeMode::FromStart => 0..count,
        RangeMode::FromEnd => row_count - count..row_count,
        RangeMode::FromMiddle => {
            let start = row_count / 2 - count / 2;
            start..start + count
        }
    }
}

/// Remove `count` contiguous rows from the start, end or middle of the table
pub fn drop_row_range(table: &Table, mode: RangeMode, count: usize) -> Table {
    let range = row_range(table.row_count(), mode, count);
    let mut result = table.clone();
    result.rows.drain(range);
    result
}

/// Rename columns in one pass; the resulting names must stay unique
pub fn rename_columns(table: &Table, rename_map: &IndexMap<String, String>) -> Result<Table> {
    for (old, new) in rename_map {
        if table.column_index(old).is_none() {
            return Err(CleanError::ColumnNotFound(old.clone()));
        }
        if new.trim().is_empty() {
            return Err(CleanError::InvalidParameter(format!(
                "new name for column '{}' is empty",
                old
            )));
        }
    }

    let new_names: Vec<&str> = table
        .columns
        .iter()
        .map(|c| rename_map.get(&c.name).map_or(c.name.as_str(), |n| n.as_str()))
        .collect();

    let mut seen = FxHashSet::default();
    for name in &new_names {
        if !seen.insert(*name) {
            return Err(CleanError::DuplicateColumnName(name.to_string()));
        }
    }

    let mut result = table.clone();
    for (column, name) in result.columns.iter_mut().zip(new_names) {
        column.name = name.to_string();
    }
    Ok(result)
}

/// Append a column; its name must be new and its length must match the table
pub fn add_column(table: &Table, column: Column, values: Vec<CellValue>) -> Result<Table> {
    if table.column_index(&column.name).is_some() {
        return Err(CleanError::DuplicateColumnName(column.name));
    }
    if values.len() != table.row_count() {
        return Err(CleanError::InvalidParameter(format!(
            "column '{}' has {} values but the table has {} rows",
            column.name,
            values.len(),
            table.row_count()
        )));
    }

    let mut result = table.clone();
    result.columns.push(column);
    for (row, value) in result.rows.iter_mut().zip(values) {
        row.cells.push(value);
    }
    Ok(result)
}
