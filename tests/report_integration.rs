use std::fs;
use std::path::Path;

use tempfile::tempdir;
use tradesorter::summary::{CONVERSION_FEES_LABEL, FIFO_RESULTS_LABEL, TOTAL_RESULTS_LABEL};
use tradesorter::{AppConfig, OutputFormat, ReportEngine, ReportError};

const EXPORT: &str = "\
Action,Time,ISIN,Ticker,Name,No. of shares,Price / share,Currency (Price / share),Exchange rate,Result,Total,Currency (Total),Currency conversion fee
Deposit,2024-01-02 09:00:00,,,,,,,,,5000.00,EUR,
Limit buy,2024-01-03 10:00:00,X1,ABC,Abc Corp,100,10.00,EUR,1,,1000.00,EUR,
Market buy,2024-01-04 10:00:00,X2,XYZ,Xyz Inc,10,1.00,EUR,1,,10.00,EUR,0.05
Limit sell,2024-01-05 10:00:00,X1,ABC,Abc Corp,40,15.00,EUR,1,200.00,600.00,EUR,
Market buy,2024-01-06 10:00:00,X2,XYZ,Xyz Inc,10,2.00,EUR,1,,20.00,EUR,0.05
Interest on cash,2024-01-07 00:00:00,,,,,,,,,1.25,EUR,
Limit sell,2024-01-08 10:00:00,X1,ABC,Abc Corp,80,20.00,EUR,1,800.00,1600.00,EUR,
Market sell,2024-01-09 10:00:00,X2,XYZ,Xyz Inc,10,3.00,EUR,1,20.00,30.00,EUR,0.05
Dividend (Dividend),2024-01-10 00:00:00,X2,XYZ,Xyz Inc,20,0.10,EUR,1,,2.00,EUR,
Withdrawal,2024-01-11 00:00:00,,,,,,,,,-100.00,EUR,
New card cost,2024-01-12 00:00:00,,,,,,,,,-4.99,EUR,
";

fn write_export(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("export.csv");
    fs::write(&path, EXPORT).unwrap();
    path
}

fn config(dir: &Path, format: OutputFormat) -> AppConfig {
    AppConfig {
        input: write_export(dir),
        output: dir.join("report"),
        format,
        ..AppConfig::default()
    }
}

#[test]
fn test_full_run_csv() {
    let dir = tempdir().unwrap();
    let engine = ReportEngine::new(config(dir.path(), OutputFormat::Csv));

    let report = engine.run().unwrap();

    let abc = report.sheet("ABC").unwrap();
    assert_eq!(abc.fifo.realized_gain, 800.0);
    assert_eq!(abc.fifo.remaining_shares, 0.0);
    assert_eq!(abc.fifo.unmatched_shares, 20.0);

    let xyz = report.sheet("XYZ").unwrap();
    assert_eq!(xyz.fifo.realized_gain, 20.0);
    assert_eq!(xyz.fifo.remaining_shares, 10.0);
    assert_eq!(xyz.rows.len(), 3);

    assert_eq!(report.summary.get("Deposit"), Some(5000.0));
    assert_eq!(report.summary.get("Interest on cash"), Some(1.25));
    assert_eq!(report.summary.get("Dividend (Dividend)"), Some(2.0));
    assert_eq!(report.summary.get("New card cost"), Some(-4.99));
    assert_eq!(report.summary.get(TOTAL_RESULTS_LABEL), Some(1020.0));
    assert_eq!(report.summary.get(FIFO_RESULTS_LABEL), Some(820.0));
    let fees = report.summary.get(CONVERSION_FEES_LABEL).unwrap();
    assert!((fees + 0.15).abs() < 1e-9);

    assert_eq!(report.unrecognized_actions, vec!["Withdrawal"]);
    assert_eq!(report.oversold_tickers().collect::<Vec<_>>(), vec!["ABC"]);

    let out = dir.path().join("report");
    let index = fs::read_to_string(out.join("index.txt")).unwrap();
    assert_eq!(
        index.lines().collect::<Vec<_>>(),
        vec!["Main\tMain.csv", "ABC\tABC.csv", "XYZ\tXYZ.csv"]
    );

    let main = fs::read_to_string(out.join("Main.csv")).unwrap();
    assert!(main.starts_with("Interest on cash,1.25"));
    assert!(main.contains("Fifo results,820"));

    let abc_sheet = fs::read_to_string(out.join("ABC.csv")).unwrap();
    let lines: Vec<&str> = abc_sheet.lines().collect();
    assert_eq!(lines.len(), 6); // header, 3 rows, Total, Fifo
    assert!(lines[1].contains("Limit buy"));
    assert!(lines[1].contains("-100"));
    assert!(lines[4].starts_with("Total,"));
    assert!(lines[5].starts_with("Fifo,"));
    assert!(lines[5].contains("800"));
}

#[test]
fn test_full_run_jsonl_summary_first() {
    let dir = tempdir().unwrap();
    let engine = ReportEngine::new(config(dir.path(), OutputFormat::Jsonl));

    engine.run().unwrap();

    let text = fs::read_to_string(dir.path().join("report.jsonl")).unwrap();
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["kind"], "summary");
    assert_eq!(records[0]["sheet"], "Main");
    assert_eq!(records[1]["kind"], "ticker");
    assert_eq!(records[1]["ticker"], "ABC");
    assert_eq!(records[1]["fifo"]["realized_gain"], 800.0);
    assert_eq!(records[2]["ticker"], "XYZ");
}

#[test]
fn test_ticker_filter_and_parallel() {
    let dir = tempdir().unwrap();
    let mut config = config(dir.path(), OutputFormat::Csv);
    config.ticker_pattern = Some("^XY".to_string());
    config.parallel = true;
    let engine = ReportEngine::new(config);

    let report = engine.compute(engine.load().unwrap()).unwrap();

    assert_eq!(report.sheets.len(), 1);
    assert_eq!(report.sheets[0].ticker, "XYZ");
    assert_eq!(report.summary.get(FIFO_RESULTS_LABEL), Some(20.0));
    // cash sums still cover the whole export
    assert_eq!(report.summary.get("Deposit"), Some(5000.0));

    let table = engine.table(&report).unwrap();
    assert!(table.contains("XYZ"));
    assert!(!table.contains("ABC"));
}

#[test]
fn test_malformed_row_fails_before_writing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(
        &input,
        "Action,Ticker,No. of shares,Price / share,Total\n\
         Limit buy,ABC,1,10,10\n\
         Limit sell,ABC,1,ten,10\n",
    )
    .unwrap();
    let engine = ReportEngine::new(AppConfig {
        input,
        output: dir.path().join("report"),
        ..AppConfig::default()
    });

    let err = engine.run().unwrap_err();

    assert!(matches!(err, ReportError::Data { row: 2, .. }));
    assert!(!dir.path().join("report").exists());
}

#[test]
fn test_write_failure_is_io_error() {
    let dir = tempdir().unwrap();
    let mut config = config(dir.path(), OutputFormat::Csv);
    // a plain file where the report directory should go
    let blocker = dir.path().join("blocked");
    fs::write(&blocker, "").unwrap();
    config.output = blocker;
    let engine = ReportEngine::new(config);

    let report = engine.compute(engine.load().unwrap()).unwrap();
    let err = engine.write(&report).unwrap_err();

    assert!(matches!(err, ReportError::IoError(_)));
    assert_eq!(report.sheet("ABC").unwrap().fifo.realized_gain, 800.0);
}
