pub mod aggregator;

pub use aggregator::{summarize, Summary, SummaryLine, CONVERSION_FEES_LABEL, FIFO_RESULTS_LABEL, TOTAL_RESULTS_LABEL};
