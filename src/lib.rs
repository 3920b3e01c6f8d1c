//! tablewash - Progressive cleaning of tabular data
//!
//! Loads CSV, whitespace-delimited text and Excel files into a [`Table`], applies
//! user-selected cleaning steps (column/row removal, renaming, type coercion,
//! IQR outlier removal, missing-value imputation), reports descriptive
//! statistics and exports the result as CSV, TXT, XLSX or XLS bytes.

pub mod clean;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod output;
pub mod parser;
pub mod stats;

pub use clean::{apply_cleaning, CleaningOutcome, CleaningPipeline};
pub use config::{CleaningParameters, ExportFormat, ImputationMethod, RangeMode};
pub use error::{CleanError, Result};
pub use export::export;
pub use model::{CellValue, Column, DataType, Table};
pub use parser::{load, load_remote};
pub use stats::{summarize, StatsReport};
