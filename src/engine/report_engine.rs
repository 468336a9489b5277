use std::time::Instant;

use log::{info, warn};
use serde::Serialize;

use crate::config::{AppConfig, OutputFormat};
use crate::core::{EventSource, Result, TradeEvent};
use crate::normalize::normalize;
use crate::pnl::{PnlReport, TickerSheet};
use crate::reader::CsvExportReader;
use crate::report::{CsvReportWriter, JsonlReportWriter, ReportWriter, WriterConfig};
use crate::summary::{summarize, Summary};

/// Fully computed report, independent of how it gets written.
#[derive(Debug, Clone, Serialize)]
pub struct ComputedReport {
    pub summary: Summary,
    pub sheets: Vec<TickerSheet>,
    pub unrecognized_actions: Vec<String>,
    pub out_of_order_rows: Vec<usize>,
}

impl ComputedReport {
    pub fn sheet(&self, ticker: &str) -> Option<&TickerSheet> {
        self.sheets.iter().find(|s| s.ticker == ticker)
    }

    pub fn oversold_tickers(&self) -> impl Iterator<Item = &str> {
        self.sheets
            .iter()
            .filter(|s| s.fifo.is_oversold())
            .map(|s| s.ticker.as_str())
    }
}

pub struct ReportEngine {
    config: AppConfig,
}

impl ReportEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn pnl_report(&self) -> Result<PnlReport> {
        Ok(PnlReport::new()
            .with_parallel(self.config.parallel)
            .with_ticker_filter(self.config.ticker_filter()?))
    }

    /// Read every row of the configured export
    pub fn load(&self) -> Result<Vec<TradeEvent>> {
        let start = Instant::now();
        let mut reader = CsvExportReader::open(&self.config.input)?;
        let events = reader.read_all()?;
        info!(
            "Loaded {} rows in {:.3}s",
            reader.events_read(),
            start.elapsed().as_secs_f64()
        );
        Ok(events)
    }

    /// Normalize, match every ticker and aggregate the summary
    pub fn compute(&self, raw: Vec<TradeEvent>) -> Result<ComputedReport> {
        let export = normalize(raw);
        info!(
            "{} events, {} tickers with trades",
            export.events.len(),
            export.trades_by_ticker.len()
        );

        let sheets = self.pnl_report()?.build_sheets(&export);
        let summary = summarize(&export, &sheets);

        if !export.unrecognized_actions.is_empty() {
            warn!(
                "Actions excluded from the report: {}",
                export.unrecognized_actions.join(", ")
            );
        }

        Ok(ComputedReport {
            summary,
            sheets,
            unrecognized_actions: export.unrecognized_actions,
            out_of_order_rows: export.out_of_order_rows,
        })
    }

    /// Write a computed report with the configured writer
    pub fn write(&self, report: &ComputedReport) -> Result<()> {
        let mut writer: Box<dyn ReportWriter> = match self.config.format {
            OutputFormat::Csv => Box::new(CsvReportWriter::new()),
            OutputFormat::Jsonl => Box::new(JsonlReportWriter::new()),
        };
        let config = WriterConfig {
            output: self.config.output.clone(),
        };
        write_report(report, writer.as_mut(), config)
    }

    /// Console table for the computed sheets
    pub fn table(&self, report: &ComputedReport) -> Result<String> {
        Ok(self.pnl_report()?.report(&report.sheets))
    }

    /// Load, compute and write in one go
    pub fn run(&self) -> Result<ComputedReport> {
        let raw = self.load()?;
        let report = self.compute(raw)?;
        self.write(&report)?;
        Ok(report)
    }
}

/// Summary first, then one sheet per ticker.
pub fn write_report(
    report: &ComputedReport,
    writer: &mut dyn ReportWriter,
    config: WriterConfig,
) -> Result<()> {
    writer.init(config)?;
    writer.write_summary(&report.summary)?;
    for sheet in &report.sheets {
        writer.write_ticker(sheet)?;
    }
    writer.close()
}
