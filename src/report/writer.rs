use std::path::PathBuf;

use crate::core::Result;
use crate::pnl::TickerSheet;
use crate::summary::Summary;

/// Name of the summary sheet, always placed first.
pub const MAIN_SHEET: &str = "Main";

/// Configuration for report writers
#[derive(Debug, Clone, Default)]
pub struct WriterConfig {
    /// Output location. Directory or file depending on the writer.
    pub output: PathBuf,
}

/// Trait for writers that persist a computed report
///
/// Callers write the summary before any ticker sheet.
pub trait ReportWriter {
    /// Prepare the output location
    fn init(&mut self, config: WriterConfig) -> Result<()>;

    /// Write the summary sheet
    fn write_summary(&mut self, summary: &Summary) -> Result<()>;

    /// Write one ticker's sheet
    fn write_ticker(&mut self, sheet: &TickerSheet) -> Result<()>;

    /// Finalize the output
    fn close(&mut self) -> Result<()>;

    /// Get the file extension for this writer type
    fn file_extension(&self) -> &'static str;
}
