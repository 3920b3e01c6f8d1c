//! Table, Row, and Cell data structures

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::schema::{Column, DataType};

/// A cell value with type information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            CellValue::Null => 0u8.hash(state),
            CellValue::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            // Int and Float share a hash domain so that equal values collide
            CellValue::Int(i) => {
                2u8.hash(state);
                canonical_bits(*i as f64).hash(state);
            }
            CellValue::Float(f) => {
                2u8.hash(state);
                canonical_bits(*f).hash(state);
            }
            CellValue::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            CellValue::Date(d) => {
                4u8.hash(state);
                d.hash(state);
            }
            CellValue::DateTime(dt) => {
                5u8.hash(state);
                dt.hash(state);
            }
        }
    }
}

fn canonical_bits(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else if f == 0.0 {
        0.0f64.to_bits()
    } else {
        f.to_bits()
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the cell, if it holds a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NaN"),
            _ => self.to_field(),
        }
    }

    /// Text written to an exported field; missing cells become empty fields
    pub fn to_field(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(format_float(*f)),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

/// Shortest representation that reads back to the same value
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A row in the table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original line/row number in source file (1-indexed)
    pub source_line: usize,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// Whether any cell of the row is missing
    pub fn has_missing(&self) -> bool {
        self.cells.iter().any(CellValue::is_null)
    }
}

/// A table containing columns and rows.
///
/// Rows are stored in order; every row carries exactly one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row, padding with nulls or truncating to the column count
    pub fn add_row(&mut self, mut cells: Vec<CellValue>, source_line: usize) {
        cells.resize(self.column_count(), CellValue::Null);
        self.rows.push(Row::new(cells, source_line));
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in display order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterate over the cells of one column
    pub fn column_values(&self, col_idx: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(col_idx))
    }

    /// Present numeric values of one column, in row order
    pub fn numeric_values(&self, col_idx: usize) -> Vec<f64> {
        self.column_values(col_idx).filter_map(CellValue::as_f64).collect()
    }

    /// Indices of columns whose type is numeric
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.data_type.is_numeric())
            .map(|(i, _)| i)
            .collect()
    }

    /// Re-infer the type of every column from its data
    pub fn infer_column_types(&mut self) {
        for col_idx in 0..self.column_count() {
            let inferred = DataType::infer(self.column_values(col_idx));
            if let Some(col) = self.columns.get_mut(col_idx) {
                col.data_type = inferred;
            }
        }
    }

    /// Keep only the rows for which `keep` returns true
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize, &Row) -> bool,
    {
        let mut idx = 0;
        self.rows.retain(|row| {
            let kept = keep(idx, row);
            idx += 1;
            kept
        });
    }

    /// Copy of the first `n` rows
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Copy of the last `n` rows
    pub fn tail(&self, n: usize) -> Table {
        let skip = self.row_count().saturating_sub(n);
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().skip(skip).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &CellValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_int_float_equal_values_hash_alike() {
        assert_eq!(CellValue::Int(3), CellValue::Float(3.0));
        assert_eq!(hash_of(&CellValue::Int(3)), hash_of(&CellValue::Float(3.0)));
    }

    #[test]
    fn test_add_row_pads_and_truncates() {
        let mut table = Table::new(vec![Column::new("a"), Column::new("b")]);
        table.add_row(vec![CellValue::Int(1)], 2);
        table.add_row(vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(3)], 3);

        assert_eq!(table.rows[0].cells, vec![CellValue::Int(1), CellValue::Null]);
        assert_eq!(table.rows[1].cells.len(), 2);
    }

    #[test]
    fn test_head_and_tail() {
        let mut table = Table::new(vec![Column::new("n")]);
        for i in 0..10 {
            table.add_row(vec![CellValue::Int(i)], i as usize + 2);
        }

        assert_eq!(table.head(3).rows[2].cells[0], CellValue::Int(2));
        assert_eq!(table.tail(3).rows[0].cells[0], CellValue::Int(7));
        assert_eq!(table.tail(50).row_count(), 10);
    }

    #[test]
    fn test_float_field_format() {
        assert_eq!(CellValue::Float(2.0).to_field(), "2.0");
        assert_eq!(CellValue::Float(2.25).to_field(), "2.25");
        assert_eq!(CellValue::Null.to_field(), "");
    }
}
