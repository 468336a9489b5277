use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;

use super::writer::{ReportWriter, WriterConfig, MAIN_SHEET};
use crate::core::Result;
use crate::pnl::TickerSheet;
use crate::summary::{Summary, SummaryLine};

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JsonlRecord<'a> {
    Summary {
        sheet: &'a str,
        lines: &'a [SummaryLine],
    },
    Ticker(&'a TickerSheet),
}

/// JSONL (newline-delimited JSON) report writer, one record per sheet
pub struct JsonlReportWriter {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    records: usize,
}

impl JsonlReportWriter {
    pub fn new() -> Self {
        Self {
            writer: None,
            path: PathBuf::new(),
            records: 0,
        }
    }

    fn write_record(&mut self, record: &JsonlRecord<'_>) -> Result<()> {
        if let Some(writer) = &mut self.writer {
            let line = serde_json::to_string(record)?;
            writeln!(writer, "{}", line)?;
            self.records += 1;
        }
        Ok(())
    }
}

impl ReportWriter for JsonlReportWriter {
    fn init(&mut self, config: WriterConfig) -> Result<()> {
        self.path = config.output;
        if self.path.extension().is_none() {
            self.path.set_extension(self.file_extension());
        }
        log::info!("Creating JSONL output file: {:?}", self.path);

        let file = File::create(&self.path)?;
        self.writer = Some(BufWriter::new(file));
        self.records = 0;
        Ok(())
    }

    fn write_summary(&mut self, summary: &Summary) -> Result<()> {
        self.write_record(&JsonlRecord::Summary {
            sheet: MAIN_SHEET,
            lines: &summary.lines,
        })
    }

    fn write_ticker(&mut self, sheet: &TickerSheet) -> Result<()> {
        self.write_record(&JsonlRecord::Ticker(sheet))
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            log::info!("JSONL file saved: {:?} ({} records)", self.path, self.records);
        }
        Ok(())
    }

    fn file_extension(&self) -> &'static str {
        "jsonl"
    }
}

impl Default for JsonlReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
