use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_input(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn tablewash() -> Command {
    Command::cargo_bin("tablewash").unwrap()
}

#[test]
fn stats_are_printed_for_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "data.csv", "a,b\n1,x\n2,y\n3,\n");

    tablewash()
        .arg(&input)
        .arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows:              3"))
        .stdout(predicate::str::contains("Missing values:    1"));
}

#[test]
fn json_report_is_valid_json() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "data.csv", "a;b\n1;2\n3;4\n");

    let output = tablewash()
        .arg(&input)
        .args(["--stats", "--report", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["row_count"], 2);
    assert_eq!(report["column_count"], 2);
}

#[test]
fn export_writes_default_file_name() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "data.csv", "a,b\n1,x\n2,y\n3,z\n");

    tablewash()
        .current_dir(dir.path())
        .arg(&input)
        .args(["--drop-column", "b", "--drop-row", "1", "--export", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resultat.csv"));

    let written = fs::read_to_string(dir.path().join("resultat.csv")).unwrap();
    assert_eq!(written, "a\n1\n3\n");
}

#[test]
fn export_to_explicit_path_after_cleaning() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "data.txt",
        "name value\na 1\nb 2\nc 3\nd 4\ne 5\nf 100\n",
    );
    let out = dir.path().join("clean.csv");

    tablewash()
        .arg(&input)
        .args(["--rename", "value=score", "--remove-outliers", "--export", "csv"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Outlier rows removed: 1"));

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("name,score\n"));
    assert!(!written.contains("100"));
}

#[test]
fn base64_prints_data_uri() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "data.csv", "a\n1\n");

    tablewash()
        .arg(&input)
        .args(["--export", "csv", "--base64"])
        .assert()
        .success()
        .stdout(predicate::eq("data:text/csv;base64,YQoxCg==\n"));
}

#[test]
fn unsupported_extension_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "report.pdf", "%PDF-1.4");

    tablewash()
        .arg(&input)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn failed_coercion_reports_offending_value() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "data.csv", "n\n1\n2\nx\n");

    tablewash()
        .arg(&input)
        .args(["--coerce", "n=integer"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'x'"));
}

#[test]
fn missing_input_is_a_usage_error() {
    tablewash().assert().failure();
}
