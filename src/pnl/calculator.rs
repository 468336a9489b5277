use comfy_table::Table;
use log::info;
use rayon::prelude::*;
use regex::Regex;

use crate::core::TradeEvent;
use crate::normalize::NormalizedExport;
use crate::pnl::{
    fifo::FifoProcessor,
    models::{MatchingResult, TickerSheet, TotalsRow},
};

/// Runs FIFO matching over every ticker of an export and lays out the sheets
pub struct PnlReport {
    fifo_processor: FifoProcessor,
    parallel: bool,
    ticker_filter: Option<Regex>,
}

impl PnlReport {
    pub fn new() -> Self {
        Self {
            fifo_processor: FifoProcessor::new(),
            parallel: false,
            ticker_filter: None,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_ticker_filter(mut self, filter: Option<Regex>) -> Self {
        self.ticker_filter = filter;
        self
    }

    /// Calculate realized gain for a single ticker's normalized trades
    pub fn calculate(&self, trades: &[TradeEvent]) -> MatchingResult {
        if trades.is_empty() {
            return MatchingResult::default();
        }
        self.fifo_processor.process(trades)
    }

    fn includes(&self, ticker: &str) -> bool {
        self.ticker_filter
            .as_ref()
            .map_or(true, |re| re.is_match(ticker))
    }

    /// Build one sheet per ticker, sorted by ticker
    ///
    /// Tickers share no state, so with `parallel` set each one is matched
    /// on the rayon pool and results are collected in ticker order.
    pub fn build_sheets(&self, export: &NormalizedExport) -> Vec<TickerSheet> {
        let groups: Vec<(&String, &Vec<TradeEvent>)> = export
            .trades_by_ticker
            .iter()
            .filter(|(ticker, _)| self.includes(ticker))
            .collect();

        let sheets: Vec<TickerSheet> = if self.parallel {
            groups
                .par_iter()
                .map(|(ticker, trades)| self.sheet(ticker, trades))
                .collect()
        } else {
            groups
                .iter()
                .map(|(ticker, trades)| self.sheet(ticker, trades))
                .collect()
        };

        for sheet in &sheets {
            info!(
                "{}: {} rows, realized {:.2}, remaining {} shares",
                sheet.ticker,
                sheet.rows.len(),
                sheet.fifo.realized_gain,
                sheet.fifo.remaining_shares
            );
        }
        sheets
    }

    fn sheet(&self, ticker: &str, trades: &[TradeEvent]) -> TickerSheet {
        TickerSheet {
            ticker: ticker.to_string(),
            rows: trades.to_vec(),
            totals: column_totals(trades),
            fifo: self.calculate(trades),
        }
    }

    /// Generate a tabular report of the sheets
    pub fn report(&self, sheets: &[TickerSheet]) -> String {
        let mut table = Table::new();
        table.set_header(vec![
            "Ticker",
            "Rows",
            "Realized (FIFO)",
            "Result (rows)",
            "Remaining Shares",
            "Unmatched Shares",
        ]);

        let mut total_rows = 0;
        let mut total_realized = 0.0;
        let mut total_result = 0.0;

        for sheet in sheets {
            table.add_row(vec![
                sheet.ticker.clone(),
                sheet.rows.len().to_string(),
                format!("{:.2}", sheet.fifo.realized_gain),
                format!("{:.2}", sheet.totals.result),
                format!("{}", sheet.fifo.remaining_shares),
                format!("{}", sheet.fifo.unmatched_shares),
            ]);

            total_rows += sheet.rows.len();
            total_realized += sheet.fifo.realized_gain;
            total_result += sheet.totals.result;
        }

        table.add_row(vec![
            "TOTAL".to_string(),
            total_rows.to_string(),
            format!("{:.2}", total_realized),
            format!("{:.2}", total_result),
            "-".to_string(),
            "-".to_string(),
        ]);

        format!("\n=== Realized gains by ticker ===\n{}", table)
    }
}

/// Sums of the numeric columns for the `Total` row.
pub fn column_totals(trades: &[TradeEvent]) -> TotalsRow {
    trades.iter().fold(TotalsRow::default(), |acc, t| TotalsRow {
        total: acc.total + t.total,
        shares: acc.shares + t.shares,
        result: acc.result + t.result,
        currency_conversion_fee: acc.currency_conversion_fee + t.currency_conversion_fee,
    })
}

impl Default for PnlReport {
    fn default() -> Self {
        Self::new()
    }
}
