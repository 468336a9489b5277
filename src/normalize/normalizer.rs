use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use log::{debug, warn};

use crate::core::{Action, TradeEvent};

/// Export after sign normalization, split into the streams the rest of the
/// pipeline reads.
///
/// Buy rows carry negative `shares` and `total`, sell rows positive ones, and
/// every `currency_conversion_fee` is the negated raw value.
#[derive(Debug, Clone, Default)]
pub struct NormalizedExport {
    /// Every event in file order.
    pub events: Vec<TradeEvent>,
    /// Buy/sell events grouped by ticker, each group in file order.
    pub trades_by_ticker: BTreeMap<String, Vec<TradeEvent>>,
    /// Distinct unrecognized action labels, first-seen order.
    pub unrecognized_actions: Vec<String>,
    /// Trade rows whose timestamp is earlier than the previous row of the
    /// same ticker. Matching still follows file order.
    pub out_of_order_rows: Vec<usize>,
}

impl NormalizedExport {
    /// Events that are neither buys nor sells.
    pub fn cash_events(&self) -> impl Iterator<Item = &TradeEvent> {
        self.events.iter().filter(|e| e.side().is_none())
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.trades_by_ticker.keys().map(String::as_str)
    }
}

/// Apply the sign convention to raw export rows and partition them.
pub fn normalize(raw: Vec<TradeEvent>) -> NormalizedExport {
    let mut export = NormalizedExport::default();

    for mut event in raw {
        event.currency_conversion_fee = -event.currency_conversion_fee;
        if event.mentions_buy() {
            event.shares = -event.shares;
            event.total = -event.total;
        }

        match event.kind() {
            Action::Trade(_) => {
                export
                    .trades_by_ticker
                    .entry(event.ticker.clone())
                    .or_default()
                    .push(event.clone());
            }
            Action::Cash(category) => {
                debug!("Row {}: cash event {:?} {:.2}", event.row, category, event.total);
            }
            Action::Unrecognized => {
                if !export.unrecognized_actions.contains(&event.action) {
                    warn!(
                        "Unrecognized action {:?} (first seen at row {}), excluded from all sums",
                        event.action, event.row
                    );
                    export.unrecognized_actions.push(event.action.clone());
                }
            }
        }

        export.events.push(event);
    }

    for (ticker, trades) in &export.trades_by_ticker {
        for row in out_of_order(trades) {
            warn!("{}: row {} is earlier than the row before it", ticker, row);
            export.out_of_order_rows.push(row);
        }
    }
    export.out_of_order_rows.sort_unstable();

    export
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

fn out_of_order(trades: &[TradeEvent]) -> Vec<usize> {
    let mut rows = Vec::new();
    let mut last: Option<NaiveDateTime> = None;

    for trade in trades {
        let Some(text) = trade.time.as_deref() else {
            continue;
        };
        let Ok(time) = NaiveDateTime::parse_from_str(text, TIME_FORMAT) else {
            warn!("Row {}: unparsed time {:?}, not checked for order", trade.row, text);
            continue;
        };
        if last.is_some_and(|prev| time < prev) {
            rows.push(trade.row);
        }
        last = Some(time);
    }
    rows
}
