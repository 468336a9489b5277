use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use tradesorter::{validate_config, AppConfig, OutputFormat, ReportEngine};

#[derive(Parser, Debug)]
#[command(author, version, about = "Process exported data from trading212", long_about = None)]
struct Args {
    /// Path to the trading212 export CSV file
    csv_file: PathBuf,

    /// Output path (directory for csv, file for jsonl)
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Only match and write tickers matching this regex
    /// Example: '^(AAPL|MSFT)$'
    #[arg(short, long)]
    tickers: Option<String>,

    /// Match tickers in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Do not print the per-ticker table
    #[arg(long, default_value_t = false)]
    no_table: bool,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            input: args.csv_file,
            output: args.output,
            format: args.format,
            ticker_pattern: args.tickers,
            parallel: args.parallel,
            print_table: !args.no_table,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let start = Instant::now();
    let config = AppConfig::from(Args::parse());
    validate_config(&config).context("Invalid arguments")?;

    let engine = ReportEngine::new(config);
    let raw = engine
        .load()
        .with_context(|| format!("Failed to read {:?}", engine.config().input))?;
    let report = engine.compute(raw)?;

    if engine.config().print_table {
        println!("{}", engine.table(&report)?);
    }

    println!("\n=== Summary ===");
    for (label, value) in report.summary.iter() {
        println!("{:<45} {:>12.2}", label, value);
    }

    for ticker in report.oversold_tickers() {
        println!("Warning: {} sells more shares than it bought, realized gain is under-counted", ticker);
    }
    if !report.unrecognized_actions.is_empty() {
        println!(
            "Warning: unrecognized actions ignored: {}",
            report.unrecognized_actions.join(", ")
        );
    }

    engine
        .write(&report)
        .with_context(|| format!("Failed to write report to {:?}", engine.config().output))?;

    log::info!("Total execution time: {:.2} seconds", start.elapsed().as_secs_f64());
    Ok(())
}
