use std::collections::VecDeque;

use log::{debug, warn};

use crate::core::{Side, TradeEvent};
use crate::pnl::models::{LotMatch, MatchingResult, OpenLot, SHARE_EPSILON};

/// FIFO (First-In-First-Out) lot matching for a single ticker
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoProcessor;

impl FifoProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Replay one ticker's normalized trades in order and compute realized gain
    ///
    /// # Arguments
    /// * `trades` - Buy/sell events of one ticker, already sign-normalized
    ///
    /// # Returns
    /// * `MatchingResult` - realized gain, open lots and the remaining position
    pub fn process(&self, trades: &[TradeEvent]) -> MatchingResult {
        let mut lots: VecDeque<OpenLot> = VecDeque::new();
        let mut result = MatchingResult::default();

        for trade in trades {
            result.net_shares += trade.shares;

            let Some(side) = trade.side() else {
                continue;
            };
            let shares = trade.shares.abs();
            let price = trade.price_per_share;
            if shares == 0.0 || price == 0.0 {
                debug!("Row {}: zero shares or price, skipped", trade.row);
                continue;
            }

            match side {
                Side::Buy => lots.push_back(OpenLot {
                    shares_remaining: shares,
                    price_per_share: price,
                }),
                Side::Sell => {
                    let unmatched = Self::consume(&mut lots, &mut result, trade.row, shares, price);
                    if unmatched > 0.0 {
                        warn!(
                            "{}: sell at row {} exceeds open lots by {} shares, remainder not matched",
                            trade.ticker, trade.row, unmatched
                        );
                        result.unmatched_shares += unmatched;
                    }
                }
            }
        }

        result.remaining_shares = lots.iter().map(|l| l.shares_remaining).sum();
        result.open_lots = lots.into_iter().collect();

        if !result.is_consistent() {
            if let Some(first) = trades.first() {
                warn!(
                    "{}: open lots hold {} shares but the share column implies {}",
                    first.ticker,
                    result.remaining_shares,
                    result.unmatched_shares - result.net_shares
                );
            }
        }

        result
    }

    /// Consume lots from the front for one sell. Returns the shares left
    /// without a lot.
    fn consume(
        lots: &mut VecDeque<OpenLot>,
        result: &mut MatchingResult,
        row: usize,
        mut incoming: f64,
        price: f64,
    ) -> f64 {
        while incoming > SHARE_EPSILON {
            let Some(lot) = lots.front_mut() else {
                break;
            };

            let consumed = if lot.shares_remaining >= incoming {
                incoming
            } else {
                lot.shares_remaining
            };
            let gain = (price - lot.price_per_share) * consumed;

            result.realized_gain += gain;
            result.matches.push(LotMatch {
                row,
                shares: consumed,
                open_price: lot.price_per_share,
                close_price: price,
                gain,
            });

            lot.shares_remaining -= consumed;
            incoming -= consumed;

            // exhausted lots never match again; float leftovers count as exhausted
            if lot.shares_remaining <= SHARE_EPSILON {
                lots.pop_front();
            }
        }

        if incoming > SHARE_EPSILON {
            incoming
        } else {
            0.0
        }
    }
}
