//! Serialization of tables into downloadable files

mod delimited;
mod xlsx;

use base64::{engine::general_purpose, Engine as _};
use tracing::debug;

use crate::config::ExportFormat;
use crate::error::Result;
use crate::model::Table;

pub use delimited::DelimitedExporter;
pub use xlsx::XlsxExporter;

/// Trait for table serializers
pub trait Exporter {
    /// Serialize the whole table into a buffer
    fn export(&self, table: &Table) -> Result<Vec<u8>>;
}

/// Factory for creating exporters
pub struct ExporterFactory;

impl ExporterFactory {
    /// Create an exporter based on format type
    pub fn create(format: ExportFormat) -> Box<dyn Exporter> {
        match format {
            ExportFormat::Csv => Box::new(DelimitedExporter::csv()),
            ExportFormat::Txt => Box::new(DelimitedExporter::tab()),
            ExportFormat::Xlsx | ExportFormat::Xls => Box::new(XlsxExporter::new()),
        }
    }
}

/// Serialize a table in the requested format
pub fn export(table: &Table, format: ExportFormat) -> Result<Vec<u8>> {
    let bytes = ExporterFactory::create(format).export(table)?;
    debug!(format = format.extension(), bytes = bytes.len(), "exported table");
    Ok(bytes)
}

/// An exported file ready to be offered for download
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Base64 payload of the file
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// `data:` URI embedding the file
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// Export a table and wrap it with its download name and MIME type
pub fn prepare_download(table: &Table, format: ExportFormat) -> Result<Download> {
    Ok(Download {
        file_name: format.file_name(),
        mime_type: format.mime_type(),
        bytes: export(table, format)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Column};

    #[test]
    fn test_download_link() {
        let mut table = Table::new(vec![Column::new("a")]);
        table.add_row(vec![CellValue::Int(1)], 2);

        let download = prepare_download(&table, ExportFormat::Csv).unwrap();
        assert_eq!(download.file_name, "resultat.csv");
        assert_eq!(download.bytes, b"a\n1\n");
        assert_eq!(download.to_base64(), "YQoxCg==");
        assert_eq!(download.data_uri(), "data:text/csv;base64,YQoxCg==");
    }
}
