pub mod core;
pub mod config;
pub mod reader;
pub mod normalize;
pub mod pnl;
pub mod summary;
pub mod report;
pub mod engine;

// Re-export commonly used types
pub use crate::core::{
    Action, CashCategory, EventSource, ReportError, Result, Side, TradeEvent,
};
pub use config::{validate_config, AppConfig, OutputFormat};
pub use engine::{ComputedReport, ReportEngine};
pub use normalize::{normalize, NormalizedExport};
pub use pnl::{FifoProcessor, MatchingResult, PnlReport, TickerSheet};
pub use summary::{summarize, Summary};
