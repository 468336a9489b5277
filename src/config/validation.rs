use std::path::PathBuf;

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{ReportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Directory of CSV sheets
    #[default]
    Csv,
    /// Single newline-delimited JSON file
    Jsonl,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub ticker_pattern: Option<String>,
    pub parallel: bool,
    pub print_table: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::from("output"),
            format: OutputFormat::Csv,
            ticker_pattern: None,
            parallel: false,
            print_table: true,
        }
    }
}

impl AppConfig {
    /// Compiled ticker filter, if one was configured
    pub fn ticker_filter(&self) -> Result<Option<Regex>> {
        self.ticker_pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    ReportError::InvalidConfig(format!("Invalid ticker pattern {:?}: {}", pattern, e))
                })
            })
            .transpose()
    }
}

pub fn validate_config(config: &AppConfig) -> Result<()> {
    if !config.input.is_file() {
        return Err(ReportError::InvalidConfig(format!(
            "Input file {:?} does not exist or is not a file",
            config.input
        )));
    }

    if config.output.as_os_str().is_empty() {
        return Err(ReportError::InvalidConfig(
            "Output path must not be empty".to_string(),
        ));
    }

    if config.output == config.input {
        return Err(ReportError::InvalidConfig(
            "Output path must differ from the input file".to_string(),
        ));
    }

    config.ticker_filter()?;

    Ok(())
}
