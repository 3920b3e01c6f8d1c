//! Parser layer for reading the supported tabular formats

mod csv;
mod excel;
mod remote;
mod text;

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{CleanError, Result};
use crate::model::{CellValue, Table};

pub use self::csv::{parse_delimited, CsvParser, DelimitedOptions};
pub use self::excel::ExcelParser;
pub use self::remote::{parse_remote_text, RemoteLoader};
pub use self::text::TextParser;

/// Trait for parsing raw file contents into a Table
pub trait Parser: Send + Sync {
    /// Parse the full contents of a file
    fn parse(&self, bytes: &[u8]) -> Result<Table>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for selecting a parser based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(CsvParser),
                Box::new(TextParser),
                Box::new(ExcelParser),
            ],
        }
    }

    /// Get a parser for the given extension (with or without a leading dot)
    pub fn get_parser(&self, extension: &str) -> Result<&dyn Parser> {
        let ext = extension.trim_start_matches('.').to_lowercase();

        self.parsers
            .iter()
            .find(|p| p.supports_extension(&ext))
            .map(|p| p.as_ref())
            .ok_or_else(|| CleanError::UnsupportedFormat(extension.to_string()))
    }

    /// Parse in-memory file contents
    pub fn load(&self, source: &[u8], extension: &str) -> Result<Table> {
        let parser = self.get_parser(extension)?;
        debug!(extension, bytes = source.len(), "parsing input");
        let table = parser.parse(source)?;
        info!(
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );
        Ok(table)
    }

    /// Parse a stream, buffering it fully first
    pub fn load_reader<R: Read>(&self, mut reader: R, extension: &str) -> Result<Table> {
        // Reject the format before consuming the stream
        self.get_parser(extension)?;
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        self.load(&buffer, extension)
    }

    /// Parse a file on disk, choosing the parser from its extension
    pub fn load_path(&self, path: &Path) -> Result<Table> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.get_parser(ext)?;
        let bytes = std::fs::read(path)?;
        self.load(&bytes, ext)
    }
}

/// Parse in-memory file contents with the default parser set
pub fn load(source: &[u8], extension: &str) -> Result<Table> {
    ParserFactory::new().load(source, extension)
}

/// Fetch and parse the remote `;`-delimited dataset
pub fn load_remote(url: &str) -> Result<Table> {
    RemoteLoader::new()?.fetch(url)
}

/// Tokens read as a missing value
const MISSING_TOKENS: &[&str] = &[
    "", "na", "n/a", "nan", "null", "none", "#n/a", "<na>",
];

/// Check whether a raw field denotes a missing value
pub(crate) fn is_missing_token(s: &str) -> bool {
    let trimmed = s.trim();
    MISSING_TOKENS
        .iter()
        .any(|t| trimmed.eq_ignore_ascii_case(t))
}

/// Parse a text field into a CellValue: number when it reads as one, else string
pub(crate) fn parse_cell_value(s: &str, decimal_comma: bool) -> CellValue {
    let trimmed = s.trim();

    if is_missing_token(trimmed) {
        return CellValue::Null;
    }

    let numeric: Cow<'_, str> = if decimal_comma && trimmed.contains(',') {
        Cow::Owned(trimmed.replace(',', "."))
    } else {
        Cow::Borrowed(trimmed)
    };

    if let Ok(i) = numeric.parse::<i64>() {
        return CellValue::Int(i);
    }

    if let Ok(f) = numeric.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }

    CellValue::String(Cow::Owned(trimmed.to_string()))
}

/// Make header names unique: blanks become `Column{n}`, repeats get `.1`, `.2`, ...
pub(crate) fn unique_headers<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();

    for (i, name) in names.into_iter().enumerate() {
        let base = name.as_ref().trim();
        let base = if base.is_empty() {
            format!("Column{}", i + 1)
        } else {
            base.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.push(candidate);
    }

    seen
}

/// Drop a leading UTF-8 byte order mark
pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

/// First line of the input without its terminator
pub(crate) fn first_line(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(bytes.len());
    let line = &bytes[..end];
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value("", false), CellValue::Null);
        assert_eq!(parse_cell_value("NA", false), CellValue::Null);
        assert_eq!(parse_cell_value(" 42 ", false), CellValue::Int(42));
        assert_eq!(parse_cell_value("3.14", false), CellValue::Float(3.14));
        assert_eq!(parse_cell_value("3,5", true), CellValue::Float(3.5));
        assert_eq!(parse_cell_value("3,5", false), CellValue::from("3,5"));
        assert_eq!(parse_cell_value("hello", false), CellValue::from("hello"));
    }

    #[test]
    fn test_unique_headers() {
        let names = unique_headers(["a", "", "a", "b", "a"]);
        assert_eq!(names, vec!["a", "Column2", "a.1", "b", "a.2"]);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load(b"a,b\n1,2\n", "pdf").unwrap_err();
        assert!(matches!(err, CleanError::UnsupportedFormat(ref e) if e == "pdf"));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let table = load(b"a,b\n1,2\n", ".CSV").unwrap();
        assert_eq!(table.row_count(), 1);
    }
}
