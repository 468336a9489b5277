pub mod writer;
pub mod csv_writer;
pub mod jsonl_writer;

pub use writer::{ReportWriter, WriterConfig, MAIN_SHEET};
pub use csv_writer::CsvReportWriter;
pub use jsonl_writer::JsonlReportWriter;
