pub mod report_engine;

pub use report_engine::{write_report, ComputedReport, ReportEngine};
