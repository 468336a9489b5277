pub mod models;
pub mod fifo;
pub mod calculator;


pub use models::{LotMatch, MatchingResult, OpenLot, TickerSheet, TotalsRow};
pub use calculator::{column_totals, PnlReport};
pub use fifo::FifoProcessor;
