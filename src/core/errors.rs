use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Data error at row {row} (ticker {ticker:?}), column {column:?}: {message}")]
    Data {
        row: usize,
        ticker: String,
        column: String,
        message: String,
    },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ReportError {
    pub fn data(row: usize, ticker: &str, column: &str, message: impl Into<String>) -> Self {
        ReportError::Data {
            row,
            ticker: ticker.to_string(),
            column: column.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
