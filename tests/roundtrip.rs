use std::io::Write;

use tablewash::config::RangeMode;
use tablewash::parser::ParserFactory;
use tablewash::{
    apply_cleaning, export, load, summarize, CellValue, CleanError, CleaningParameters, Column,
    DataType, ExportFormat, ImputationMethod, Table,
};
use tempfile::NamedTempFile;

fn sample() -> Table {
    let mut table = Table::new(vec![
        Column::new("id"),
        Column::new("price"),
        Column::new("city"),
    ]);
    table.add_row(vec![1i64.into(), 2.5f64.into(), "Lyon".into()], 2);
    table.add_row(vec![2i64.into(), CellValue::Null, "Paris".into()], 3);
    table.add_row(vec![3i64.into(), 4.25f64.into(), "Nantes".into()], 4);
    table.infer_column_types();
    table
}

fn cells(table: &Table) -> Vec<Vec<CellValue>> {
    table.rows.iter().map(|r| r.cells.clone()).collect()
}

#[test]
fn csv_export_reloads_to_same_values() {
    let table = sample();
    let bytes = export(&table, ExportFormat::Csv).unwrap();
    let reloaded = load(&bytes, "csv").unwrap();

    assert_eq!(reloaded.column_names(), table.column_names());
    assert_eq!(cells(&reloaded), cells(&table));
}

#[test]
fn txt_export_reloads_through_text_parser() {
    // `sample` holds a missing price between two present columns
    let table = sample();
    let bytes = export(&table, ExportFormat::Txt).unwrap();
    assert!(bytes.starts_with(b"id\tprice\tcity\n"));

    let reloaded = load(&bytes, "txt").unwrap();
    assert_eq!(reloaded.column_names(), table.column_names());
    assert_eq!(cells(&reloaded), cells(&table));
    assert_eq!(reloaded.rows[1].cells[2], CellValue::from("Paris"));
}

#[test]
fn csv_with_extra_field_is_rejected() {
    let err = load(b"a,b\n1,2,3\n4,5\n", "csv").unwrap_err();
    assert!(matches!(
        err,
        CleanError::MalformedRow { line: 2, expected: 2, found: 3 }
    ));
}

#[test]
fn xlsx_export_reloads_from_disk() {
    let table = sample();
    let bytes = export(&table, ExportFormat::Xlsx).unwrap();

    let mut file = NamedTempFile::with_suffix(".xlsx").unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let reloaded = ParserFactory::new().load_path(file.path()).unwrap();
    assert_eq!(reloaded.column_names(), table.column_names());
    assert_eq!(cells(&reloaded), cells(&table));
}

#[test]
fn xls_export_is_readable_as_xls() {
    let table = sample();
    let bytes = export(&table, ExportFormat::Xls).unwrap();
    let reloaded = load(&bytes, "xls").unwrap();
    assert_eq!(reloaded.row_count(), 3);
    assert!(reloaded.column("city").is_some());
}

#[test]
fn full_pipeline_on_loaded_csv() {
    let source = b"id;value;label;note\n\
        1;10;a;x\n2;11;b;x\n3;12;c;\n4;13;d;x\n5;14;e;x\n\
        6;15;f;x\n7;16;g;x\n8;1000;h;x\n9;;i;x\n10;17;j;x\n";
    let table = load(source, "csv").unwrap();
    assert_eq!(table.column_count(), 4);

    let params = CleaningParameters::new()
        .with_drop_columns(vec!["note".to_string()])
        .with_drop_rows(vec![0])
        .with_drop_range(RangeMode::FromEnd, 1)
        .with_rename("label", "name")
        .with_coercion("value", DataType::Float)
        .with_outlier_removal(true)
        .with_imputation(ImputationMethod::FillMedian);

    let outcome = apply_cleaning(&table, &params).unwrap();
    let cleaned = outcome.table;

    assert_eq!(cleaned.column_names(), vec!["id", "value", "name"]);
    assert!(cleaned
        .column_values(1)
        .all(|v| !v.is_null() && v.as_f64().unwrap() < 1000.0));
    assert_eq!(outcome.outliers.unwrap().rows_removed, 1);
    assert_eq!(outcome.imputation.unwrap().filled.get("value"), Some(&1));

    let report = summarize(&cleaned);
    assert_eq!(report.total_missing, 0);
    assert_eq!(report.row_count, cleaned.row_count());
}
