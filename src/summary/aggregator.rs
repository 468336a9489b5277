use serde::{Deserialize, Serialize};

use crate::core::{Action, CashCategory};
use crate::normalize::NormalizedExport;
use crate::pnl::TickerSheet;

pub const CONVERSION_FEES_LABEL: &str = "Currency Conversion Fees";
pub const TOTAL_RESULTS_LABEL: &str = "Total results";
pub const FIFO_RESULTS_LABEL: &str = "Fifo results";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub label: String,
    pub value: f64,
}

/// Flat label -> total mapping for the `Main` sheet, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub lines: Vec<SummaryLine>,
}

impl Summary {
    fn push(&mut self, label: &str, value: f64) {
        self.lines.push(SummaryLine {
            label: label.to_string(),
            value,
        });
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.lines.iter().find(|l| l.label == label).map(|l| l.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.lines.iter().map(|l| (l.label.as_str(), l.value))
    }
}

/// Fold cash events and per-ticker results into the summary.
///
/// Cash sums and conversion fees cover the whole export. Both realized-gain
/// lines only cover the sheets passed in.
pub fn summarize(export: &NormalizedExport, sheets: &[TickerSheet]) -> Summary {
    let mut summary = Summary::default();

    for category in CashCategory::ALL {
        let sum: f64 = export
            .events
            .iter()
            .filter(|e| e.kind() == Action::Cash(category))
            .map(|e| e.total)
            .sum();
        summary.push(category.label(), sum);
    }

    let fees: f64 = export.events.iter().map(|e| e.currency_conversion_fee).sum();
    summary.push(CONVERSION_FEES_LABEL, fees);

    let (row_results, fifo_results) = sheets.iter().fold((0.0, 0.0), |(rows, fifo), sheet| {
        (rows + sheet.totals.result, fifo + sheet.fifo.realized_gain)
    });
    summary.push(TOTAL_RESULTS_LABEL, row_results);
    summary.push(FIFO_RESULTS_LABEL, fifo_results);

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TradeEvent;
    use crate::normalize::normalize;
    use crate::pnl::PnlReport;

    fn export() -> NormalizedExport {
        normalize(vec![
            TradeEvent::new("Deposit", "", 0.0, 0.0, 1000.0),
            TradeEvent::new("Deposit", "", 0.0, 0.0, 500.0),
            TradeEvent::new("Interest on cash", "", 0.0, 0.0, 0.42),
            TradeEvent::new("Lending interest", "", 0.0, 0.0, 0.08),
            TradeEvent::new("Dividend (Dividend)", "ABC", 0.0, 0.0, 3.5),
            TradeEvent::new("Dividend (Dividend manufactured payment)", "ABC", 0.0, 0.0, 0.5),
            TradeEvent::new("New card cost", "", 0.0, 0.0, -4.99),
            TradeEvent::new("deposit", "", 0.0, 0.0, 9999.0),
            TradeEvent::new("Limit buy", "ABC", 10.0, 10.0, 100.0).with_fee(0.15),
            TradeEvent::new("Limit sell", "ABC", 10.0, 12.0, 120.0)
                .with_fee(0.18)
                .with_result(19.67),
        ])
    }

    #[test]
    fn test_cash_categories_use_exact_labels() {
        let export = export();
        let summary = summarize(&export, &[]);

        assert_eq!(summary.get("Deposit"), Some(1500.0));
        assert_eq!(summary.get("Interest on cash"), Some(0.42));
        assert_eq!(summary.get("Lending interest"), Some(0.08));
        assert_eq!(summary.get("Dividend (Dividend)"), Some(3.5));
        assert_eq!(summary.get("Dividend (Dividend manufactured payment)"), Some(0.5));
        assert_eq!(summary.get("New card cost"), Some(-4.99));
        assert_eq!(export.unrecognized_actions, vec!["deposit"]);
    }

    #[test]
    fn test_fees_and_results() {
        let export = export();
        let sheets = PnlReport::new().build_sheets(&export);
        let summary = summarize(&export, &sheets);

        let fees = summary.get(CONVERSION_FEES_LABEL).unwrap();
        assert!((fees + 0.33).abs() < 1e-9);
        assert_eq!(summary.get(TOTAL_RESULTS_LABEL), Some(19.67));
        assert_eq!(summary.get(FIFO_RESULTS_LABEL), Some(20.0));
    }

    #[test]
    fn test_label_order() {
        let summary = summarize(&export(), &[]);
        let labels: Vec<&str> = summary.iter().map(|(label, _)| label).collect();

        assert_eq!(
            labels,
            vec![
                "Interest on cash",
                "Lending interest",
                "Deposit",
                "Dividend (Dividend)",
                "Dividend (Dividend manufactured payment)",
                "New card cost",
                CONVERSION_FEES_LABEL,
                TOTAL_RESULTS_LABEL,
                FIFO_RESULTS_LABEL,
            ]
        );
    }
}
