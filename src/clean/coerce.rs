//! Column type coercion
//!
//! A coercion set is applied all-or-nothing: every column is converted into a
//! scratch buffer first, and the table is only rebuilt once all of them succeed.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use tracing::debug;

use crate::error::{CleanError, Result};
use crate::model::{CellValue, DataType, Table};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%Y%m%d",
];

const FALSY_TOKENS: &[&str] = &["false", "0", "no", "n", "off", "f", "faux", "non", ""];

/// Convert the named columns to their target types.
///
/// On the first cell that cannot be converted the whole set is rejected and
/// the input table is left as it was.
pub fn coerce_types(table: &Table, coercions: &IndexMap<String, DataType>) -> Result<Table> {
    let mut converted: Vec<(usize, DataType, Vec<CellValue>)> = Vec::with_capacity(coercions.len());

    for (name, &target) in coercions {
        let col_idx = table
            .column_index(name)
            .ok_or_else(|| CleanError::ColumnNotFound(name.clone()))?;

        let mut values = Vec::with_capacity(table.row_count());
        for (row_idx, cell) in table.column_values(col_idx).enumerate() {
            let value = coerce_cell(cell, target).ok_or_else(|| CleanError::TypeConversion {
                column: name.clone(),
                target: target.to_string(),
                value: cell.to_field().into_owned(),
                row: row_idx,
            })?;
            values.push(value);
        }

        debug!(column = %name, %target, "converted column");
        converted.push((col_idx, target, values));
    }

    let mut result = table.clone();
    for (col_idx, target, values) in converted {
        result.columns[col_idx].data_type = target;
        for (row, value) in result.rows.iter_mut().zip(values) {
            row.cells[col_idx] = value;
        }
    }
    Ok(result)
}

/// Convert one cell; `None` when the value has no representation in `target`
pub fn coerce_cell(cell: &CellValue, target: DataType) -> Option<CellValue> {
    if cell.is_null() {
        return Some(CellValue::Null);
    }

    match target {
        DataType::Float | DataType::Double | DataType::Numeric => to_float(cell).map(CellValue::Float),
        DataType::Integer => to_integer(cell).map(CellValue::Int),
        DataType::String | DataType::Object => {
            Some(CellValue::String(Cow::Owned(cell.to_field().into_owned())))
        }
        DataType::Date => to_date(cell),
        DataType::Boolean => Some(CellValue::Bool(is_truthy(cell))),
    }
}

fn to_float(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Int(i) => Some(*i as f64),
        CellValue::Float(f) => Some(*f),
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn to_integer(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Int(i) => Some(*i),
        CellValue::Bool(b) => Some(i64::from(*b)),
        CellValue::String(s) => match s.trim().parse::<i64>() {
            Ok(i) => Some(i),
            Err(_) => parse_decimal(s).and_then(integral),
        },
        CellValue::Float(f) => integral(*f),
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Decimal number, accepting `,` as the decimal separator
fn parse_decimal(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let parsed = match trimmed.parse::<f64>() {
        Ok(f) => f,
        Err(_) => trimmed.replace(',', ".").parse::<f64>().ok()?,
    };
    parsed.is_finite().then_some(parsed)
}

fn to_date(cell: &CellValue) -> Option<CellValue> {
    match cell {
        CellValue::Date(_) | CellValue::DateTime(_) => Some(cell.clone()),
        CellValue::String(s) => parse_date(s),
        _ => None,
    }
}

/// Recognise a date or timestamp in the common textual layouts
pub fn parse_date(s: &str) -> Option<CellValue> {
    let trimmed = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(CellValue::DateTime(dt.naive_utc()));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(CellValue::DateTime(dt));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(CellValue::Date(d));
        }
    }

    None
}

/// Any present value is true unless it is a recognised falsy token or zero
fn is_truthy(cell: &CellValue) -> bool {
    match cell {
        CellValue::Bool(b) => *b,
        CellValue::Int(i) => *i != 0,
        CellValue::Float(f) => *f != 0.0,
        CellValue::String(s) => {
            let trimmed = s.trim();
            !FALSY_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn single_column(values: Vec<CellValue>) -> Table {
        let mut table = Table::new(vec![Column::new("v")]);
        for (i, v) in values.into_iter().enumerate() {
            table.add_row(vec![v], i + 2);
        }
        table.infer_column_types();
        table
    }

    fn coercion(target: DataType) -> IndexMap<String, DataType> {
        let mut map = IndexMap::new();
        map.insert("v".to_string(), target);
        map
    }

    #[test]
    fn test_integer_coercion_is_atomic() {
        let table = single_column(vec!["1".into(), "2".into(), "x".into()]);
        let err = coerce_types(&table, &coercion(DataType::Integer)).unwrap_err();

        match err {
            CleanError::TypeConversion { column, value, row, .. } => {
                assert_eq!(column, "v");
                assert_eq!(value, "x");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected error {:?}", other),
        }
        // The input is untouched
        assert_eq!(table.rows[0].cells[0], CellValue::from("1"));
        assert_eq!(table.columns[0].data_type, DataType::Object);
    }

    #[test]
    fn test_failure_in_second_column_rejects_whole_set() {
        let mut table = Table::new(vec![Column::new("a"), Column::new("b")]);
        table.add_row(vec!["1".into(), "1.5".into()], 2);

        let mut map = IndexMap::new();
        map.insert("a".to_string(), DataType::Integer);
        map.insert("b".to_string(), DataType::Integer);

        assert!(coerce_types(&table, &map).is_err());
    }

    #[test]
    fn test_integer_accepts_integral_floats() {
        let table = single_column(vec![CellValue::Float(2.0), "3".into(), CellValue::Null]);
        let result = coerce_types(&table, &coercion(DataType::Integer)).unwrap();

        assert_eq!(result.columns[0].data_type, DataType::Integer);
        assert_eq!(result.rows[0].cells[0], CellValue::Int(2));
        assert_eq!(result.rows[1].cells[0], CellValue::Int(3));
        assert_eq!(result.rows[2].cells[0], CellValue::Null);
    }

    #[test]
    fn test_float_accepts_decimal_comma() {
        let table = single_column(vec!["2,5".into(), CellValue::Int(1)]);
        let result = coerce_types(&table, &coercion(DataType::Double)).unwrap();
        assert_eq!(result.rows[0].cells[0], CellValue::Float(2.5));
        assert_eq!(result.rows[1].cells[0], CellValue::Float(1.0));
    }

    #[test]
    fn test_string_and_boolean() {
        let table = single_column(vec![CellValue::Int(0), "no".into(), "oui".into()]);

        let strings = coerce_types(&table, &coercion(DataType::String)).unwrap();
        assert_eq!(strings.rows[0].cells[0], CellValue::from("0"));

        let bools = coerce_types(&table, &coercion(DataType::Boolean)).unwrap();
        assert_eq!(bools.rows[0].cells[0], CellValue::Bool(false));
        assert_eq!(bools.rows[1].cells[0], CellValue::Bool(false));
        assert_eq!(bools.rows[2].cells[0], CellValue::Bool(true));
    }

    #[test]
    fn test_date_recognition() {
        assert_eq!(
            parse_date("2024-03-01"),
            Some(CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
        );
        assert_eq!(
            parse_date("25/12/2023"),
            Some(CellValue::Date(NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()))
        );
        assert!(matches!(parse_date("2024-03-01 10:30:00"), Some(CellValue::DateTime(_))));
        assert_eq!(parse_date("tomorrow"), None);

        let table = single_column(vec!["2024-03-01".into(), CellValue::Int(5)]);
        assert!(coerce_types(&table, &coercion(DataType::Date)).is_err());
    }

    #[test]
    fn test_unknown_column() {
        let table = single_column(vec![CellValue::Int(1)]);
        let mut map = IndexMap::new();
        map.insert("ghost".to_string(), DataType::Float);
        assert!(matches!(
            coerce_types(&table, &map),
            Err(CleanError::ColumnNotFound(_))
        ));
    }
}
