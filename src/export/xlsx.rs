//! Office Open XML workbook output
//!
//! The package holds a single worksheet. Strings are written inline so no
//! shared-string table is needed.

use std::fmt::Write as _;
use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::model::{CellValue, Table};

use super::Exporter;

const SHEET_NAME: &str = "Sheet1";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="1"><fill><patternFill patternType="none"/></fill></fills><borders count="1"><border/></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs></styleSheet>"#;

/// Writes a table as a one-sheet `.xlsx` package
pub struct XlsxExporter {
    compression: CompressionMethod,
}

impl XlsxExporter {
    pub fn new() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for XlsxExporter {
    fn export(&self, table: &Table) -> Result<Vec<u8>> {
        let options = SimpleFileOptions::default().compression_method(self.compression);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let parts: [(&str, String); 5] = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", ROOT_RELS.to_string()),
            ("xl/workbook.xml", workbook_xml()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
            ("xl/styles.xml", STYLES.to_string()),
        ];
        for (name, content) in &parts {
            zip.start_file(*name, options)?;
            zip.write_all(content.as_bytes())?;
        }

        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        zip.write_all(sheet_xml(table).as_bytes())?;

        Ok(zip.finish()?.into_inner())
    }
}

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        SHEET_NAME
    )
}

fn sheet_xml(table: &Table) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    // Header row
    xml.push_str(r#"<row r="1">"#);
    for (col_idx, column) in table.columns.iter().enumerate() {
        push_inline_string(&mut xml, &cell_reference(col_idx, 1), &column.name);
    }
    xml.push_str("</row>");

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_number = row_idx + 2;
        let _ = write!(xml, r#"<row r="{}">"#, row_number);
        for (col_idx, cell) in row.cells.iter().enumerate() {
            let reference = cell_reference(col_idx, row_number);
            match cell {
                CellValue::Null => {}
                CellValue::Int(_) | CellValue::Float(_) => {
                    let _ = write!(xml, r#"<c r="{}"><v>{}</v></c>"#, reference, cell.to_field());
                }
                CellValue::Bool(b) => {
                    let _ = write!(xml, r#"<c r="{}" t="b"><v>{}</v></c>"#, reference, u8::from(*b));
                }
                _ => push_inline_string(&mut xml, &reference, &cell.to_field()),
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_inline_string(xml: &mut String, reference: &str, text: &str) {
    let _ = write!(
        xml,
        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        reference,
        escape(text)
    );
}

/// A1-style reference of a zero-based column and one-based row
fn cell_reference(col_idx: usize, row_number: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col_idx + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    format!("{}{}", String::from_utf8_lossy(&letters), row_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    #[test]
    fn test_cell_reference() {
        assert_eq!(cell_reference(0, 1), "A1");
        assert_eq!(cell_reference(25, 3), "Z3");
        assert_eq!(cell_reference(26, 2), "AA2");
        assert_eq!(cell_reference(701, 9), "ZZ9");
        assert_eq!(cell_reference(702, 9), "AAA9");
    }

    #[test]
    fn test_sheet_xml_escapes_and_skips_missing() {
        let mut table = Table::new(vec![Column::new("a<b"), Column::new("n")]);
        table.add_row(vec![CellValue::from("x & y"), CellValue::Null], 2);
        table.add_row(vec![CellValue::Bool(true), CellValue::Float(1.5)], 3);

        let xml = sheet_xml(&table);
        assert!(xml.contains("a&lt;b"));
        assert!(xml.contains("x &amp; y"));
        assert!(!xml.contains(r#"r="B2""#));
        assert!(xml.contains(r#"<c r="A3" t="b"><v>1</v></c>"#));
        assert!(xml.contains(r#"<c r="B3"><v>1.5</v></c>"#));
    }

    #[test]
    fn test_package_is_a_zip_archive() {
        let mut table = Table::new(vec![Column::new("a")]);
        table.add_row(vec![CellValue::Int(1)], 2);

        let bytes = XlsxExporter::new().export(&table).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }
}
