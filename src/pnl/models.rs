use serde::{Deserialize, Serialize};

/// Tolerance used when comparing share counts built from float sums.
pub const SHARE_EPSILON: f64 = 1e-6;

/// Unconsumed part of one purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenLot {
    pub shares_remaining: f64,
    pub price_per_share: f64,
}

/// One step of a sell consuming (part of) a lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotMatch {
    pub row: usize,
    pub shares: f64,
    pub open_price: f64,
    pub close_price: f64,
    pub gain: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingResult {
    pub realized_gain: f64,
    /// Sum of shares still held in open lots.
    pub remaining_shares: f64,
    /// Sold shares that found no lot to match against.
    pub unmatched_shares: f64,
    /// Independent sum of the normalized share column (sells minus buys).
    pub net_shares: f64,
    pub matches: Vec<LotMatch>,
    pub open_lots: Vec<OpenLot>,
}

impl MatchingResult {
    /// Difference between the lot queue and the independently summed
    /// share column. Zero for a consistent run.
    pub fn share_drift(&self) -> f64 {
        self.remaining_shares - (self.unmatched_shares - self.net_shares)
    }

    pub fn is_consistent(&self) -> bool {
        self.share_drift().abs() <= SHARE_EPSILON
    }

    pub fn is_oversold(&self) -> bool {
        self.unmatched_shares > 0.0
    }
}

/// Column sums appended under a ticker's rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsRow {
    pub total: f64,
    pub shares: f64,
    pub result: f64,
    pub currency_conversion_fee: f64,
}

/// Everything the writers need for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSheet {
    pub ticker: String,
    pub rows: Vec<crate::core::TradeEvent>,
    pub totals: TotalsRow,
    pub fifo: MatchingResult,
}
