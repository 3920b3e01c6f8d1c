//! Cleaning parameters and format selectors

use indexmap::IndexMap;

use crate::model::DataType;

/// How missing values are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImputationMethod {
    /// Remove every row holding a missing value
    Drop,
    /// Fill numeric columns with their median
    FillMedian,
    /// Fill numeric columns with their mean
    FillMean,
}

impl std::str::FromStr for ImputationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(ImputationMethod::Drop),
            "median" | "fill-median" => Ok(ImputationMethod::FillMedian),
            "mean" | "fill-mean" => Ok(ImputationMethod::FillMean),
            _ => Err(format!("Unknown imputation method: {}", s)),
        }
    }
}

/// Where a contiguous block of rows is removed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    FromStart,
    FromEnd,
    FromMiddle,
}

impl std::str::FromStr for RangeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(RangeMode::FromStart),
            "end" => Ok(RangeMode::FromEnd),
            "middle" => Ok(RangeMode::FromMiddle),
            _ => Err(format!("Unknown range mode: {}", s)),
        }
    }
}

/// A row-range deletion request, written `mode:count` on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub mode: RangeMode,
    pub count: usize,
}

impl std::str::FromStr for RowRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mode, count) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected MODE:COUNT, got: {}", s))?;
        let count = count
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("Invalid row count: {}", count))?;
        Ok(RowRange {
            mode: mode.trim().parse()?,
            count,
        })
    }
}

/// Output format for exported tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
    Xls,
    Txt,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Xls => "xls",
            ExportFormat::Txt => "txt",
        }
    }

    /// Suggested download name
    pub fn file_name(self) -> String {
        format!("resultat.{}", self.extension())
    }

    /// MIME type used in a download link
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Txt => "text/plain",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Xls => "application/vnd.ms-excel",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "xls" => Ok(ExportFormat::Xls),
            "txt" => Ok(ExportFormat::Txt),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

/// Output format for statistics reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(ReportFormat::Terminal),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// User selections applied to a table, in pipeline order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningParameters {
    /// Columns to remove
    pub drop_columns: Vec<String>,
    /// Row positions to remove
    pub drop_rows: Vec<usize>,
    /// Contiguous block of rows to remove
    pub drop_range: Option<RowRange>,
    /// Old name to new name
    pub rename_map: IndexMap<String, String>,
    /// Column name to target type
    pub type_coercions: IndexMap<String, DataType>,
    /// Remove rows holding IQR outliers
    pub remove_outliers: bool,
    /// How missing values are handled, if at all
    pub imputation_method: Option<ImputationMethod>,
}

impl CleaningParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set columns to remove
    pub fn with_drop_columns(mut self, columns: Vec<String>) -> Self {
        self.drop_columns = columns;
        self
    }

    /// Set row positions to remove
    pub fn with_drop_rows(mut self, rows: Vec<usize>) -> Self {
        self.drop_rows = rows;
        self
    }

    /// Set a contiguous row block to remove
    pub fn with_drop_range(mut self, mode: RangeMode, count: usize) -> Self {
        self.drop_range = Some(RowRange { mode, count });
        self
    }

    /// Add a column rename
    pub fn with_rename(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.rename_map.insert(old.into(), new.into());
        self
    }

    /// Add a type coercion
    pub fn with_coercion(mut self, column: impl Into<String>, target: DataType) -> Self {
        self.type_coercions.insert(column.into(), target);
        self
    }

    /// Enable outlier removal
    pub fn with_outlier_removal(mut self, enabled: bool) -> Self {
        self.remove_outliers = enabled;
        self
    }

    /// Set imputation method
    pub fn with_imputation(mut self, method: ImputationMethod) -> Self {
        self.imputation_method = Some(method);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_range() {
        let range: RowRange = "middle:4".parse().unwrap();
        assert_eq!(range.mode, RangeMode::FromMiddle);
        assert_eq!(range.count, 4);

        assert!("middle".parse::<RowRange>().is_err());
        assert!("sideways:3".parse::<RowRange>().is_err());
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(ExportFormat::Xlsx.file_name(), "resultat.xlsx");
        assert_eq!("TXT".parse::<ExportFormat>(), Ok(ExportFormat::Txt));
    }
}
