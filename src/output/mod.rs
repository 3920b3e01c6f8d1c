//! Rendering of statistics reports

mod json;
mod terminal;

use std::io::Write;

use crate::config::ReportFormat;
use crate::error::Result;
use crate::stats::StatsReport;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for report formatters
pub trait OutputFormatter {
    /// Render a statistics report to a writer
    fn render(&self, report: &StatsReport, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: ReportFormat) -> Box<dyn OutputFormatter> {
        match format {
            ReportFormat::Terminal => Box::new(TerminalOutput::new()),
            ReportFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render a statistics report to stdout
pub fn render_to_stdout(report: &StatsReport, format: ReportFormat) -> Result<()> {
    let formatter = OutputFactory::create(format);
    let mut stdout = std::io::stdout();
    formatter.render(report, &mut stdout)
}
