use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;

use super::writer::{ReportWriter, WriterConfig, MAIN_SHEET};
use crate::core::Result;
use crate::pnl::TickerSheet;
use crate::summary::Summary;

const SHEET_HEADER: [&str; 9] = [
    "Row",
    "Time",
    "Action",
    "Ticker",
    "No. of shares",
    "Price / share",
    "Result",
    "Total",
    "Currency conversion fee",
];

/// Writes the report as a directory of CSV sheets
///
/// `Main.csv` holds the summary, one file per ticker holds its sheet and
/// `index.txt` lists `sheet<TAB>file` pairs in display order.
///
/// Ticker file stems are unique ignoring case and never reuse `Main` or
/// `index`; a colliding stem gets a `-2`, `-3`, ... suffix.
pub struct CsvReportWriter {
    dir: PathBuf,
    /// (sheet name, file name)
    sheets: Vec<(String, String)>,
    used_stems: HashSet<String>,
}

const INDEX_STEM: &str = "index";

impl CsvReportWriter {
    pub fn new() -> Self {
        Self {
            dir: PathBuf::new(),
            sheets: Vec::new(),
            used_stems: Self::reserved_stems(),
        }
    }

    fn reserved_stems() -> HashSet<String> {
        [MAIN_SHEET, INDEX_STEM]
            .iter()
            .map(|s| s.to_lowercase())
            .collect()
    }

    /// Claim a file name for a ticker sheet.
    fn claim_file_name(&mut self, ticker: &str) -> String {
        let base: String = ticker
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();

        let mut stem = base.clone();
        let mut n = 2;
        while !self.used_stems.insert(stem.to_lowercase()) {
            stem = format!("{}-{}", base, n);
            n += 1;
        }
        format!("{}.{}", stem, self.file_extension())
    }

    fn open(&self, path: &Path) -> Result<Writer<File>> {
        log::debug!("Writing sheet {:?}", path);
        Ok(Writer::from_path(path)?)
    }
}

impl ReportWriter for CsvReportWriter {
    fn init(&mut self, config: WriterConfig) -> Result<()> {
        self.dir = config.output;
        self.sheets.clear();
        self.used_stems = Self::reserved_stems();
        fs::create_dir_all(&self.dir)?;
        log::info!("Writing CSV report to {:?}", self.dir);
        Ok(())
    }

    fn write_summary(&mut self, summary: &Summary) -> Result<()> {
        let file_name = format!("{}.{}", MAIN_SHEET, self.file_extension());
        let mut writer = self.open(&self.dir.join(&file_name))?;
        for (label, value) in summary.iter() {
            writer.write_record([label.to_string(), value.to_string()])?;
        }
        writer.flush()?;
        self.sheets.insert(0, (MAIN_SHEET.to_string(), file_name));
        Ok(())
    }

    fn write_ticker(&mut self, sheet: &TickerSheet) -> Result<()> {
        let file_name = self.claim_file_name(&sheet.ticker);
        let mut writer = self.open(&self.dir.join(&file_name))?;
        writer.write_record(SHEET_HEADER)?;

        for row in &sheet.rows {
            writer.write_record([
                row.row.to_string(),
                row.time.clone().unwrap_or_default(),
                row.action.clone(),
                row.ticker.clone(),
                row.shares.to_string(),
                row.price_per_share.to_string(),
                row.result.to_string(),
                row.total.to_string(),
                row.currency_conversion_fee.to_string(),
            ])?;
        }

        let totals = &sheet.totals;
        writer.write_record([
            "Total".to_string(),
            String::new(),
            String::new(),
            String::new(),
            totals.shares.to_string(),
            String::new(),
            totals.result.to_string(),
            totals.total.to_string(),
            totals.currency_conversion_fee.to_string(),
        ])?;

        // realized gain in the Result column, open position in the shares column
        writer.write_record([
            "Fifo".to_string(),
            String::new(),
            String::new(),
            String::new(),
            sheet.fifo.remaining_shares.to_string(),
            String::new(),
            sheet.fifo.realized_gain.to_string(),
            String::new(),
            String::new(),
        ])?;

        writer.flush()?;
        self.sheets.push((sheet.ticker.clone(), file_name));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut index = File::create(self.dir.join(format!("{}.txt", INDEX_STEM)))?;
        for (sheet, file_name) in &self.sheets {
            writeln!(index, "{}\t{}", sheet, file_name)?;
        }
        index.flush()?;
        log::info!("CSV report saved: {} sheets in {:?}", self.sheets.len(), self.dir);
        Ok(())
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }
}

impl Default for CsvReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
