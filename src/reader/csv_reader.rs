use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};

use crate::core::{
    errors::{ReportError, Result},
    traits::EventSource,
    Action, TradeEvent,
};

pub const ACTION_COLUMN: &str = "Action";
pub const TICKER_COLUMN: &str = "Ticker";
pub const SHARES_COLUMN: &str = "No. of shares";
pub const PRICE_COLUMN: &str = "Price / share";
pub const TOTAL_COLUMN: &str = "Total";
pub const RESULT_COLUMN: &str = "Result";
pub const FEE_COLUMN: &str = "Currency conversion fee";
pub const TIME_COLUMN: &str = "Time";

/// Positions of the columns we read, found from the header row.
#[derive(Debug, Clone)]
struct ExportColumns {
    action: usize,
    ticker: usize,
    shares: usize,
    price: usize,
    total: usize,
    result: Option<usize>,
    fee: Option<usize>,
    time: Option<usize>,
}

impl ExportColumns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require =
            |name: &str| find(name).ok_or_else(|| ReportError::MissingColumn(name.to_string()));

        Ok(Self {
            action: require(ACTION_COLUMN)?,
            ticker: require(TICKER_COLUMN)?,
            shares: require(SHARES_COLUMN)?,
            price: require(PRICE_COLUMN)?,
            total: require(TOTAL_COLUMN)?,
            result: find(RESULT_COLUMN),
            fee: find(FEE_COLUMN),
            time: find(TIME_COLUMN),
        })
    }
}

/// Reads a brokerage CSV export row by row
pub struct CsvExportReader<R: Read> {
    reader: csv::Reader<R>,
    columns: ExportColumns,
    record: StringRecord,
    rows_read: usize,
}

impl CsvExportReader<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading export {:?}", path);
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read> CsvExportReader<R> {
    pub fn from_reader(input: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        debug!("Export columns: {:?}", headers);
        let columns = ExportColumns::from_headers(&headers)?;

        Ok(Self {
            reader,
            columns,
            record: StringRecord::new(),
            rows_read: 0,
        })
    }

    fn parse_record(&self, row: usize) -> Result<TradeEvent> {
        let cols = &self.columns;
        let field = |idx: usize| self.record.get(idx).unwrap_or("");
        let optional = |idx: Option<usize>| idx.map(field).unwrap_or("");

        let action = field(cols.action).to_string();
        let ticker = field(cols.ticker).to_string();
        let is_trade = Action::classify(&action).side().is_some();

        if is_trade && ticker.is_empty() {
            return Err(ReportError::data(row, &ticker, TICKER_COLUMN, "trade row without ticker"));
        }

        let number = |text: &str, column: &str, required: bool| -> Result<f64> {
            if text.is_empty() {
                if required {
                    return Err(ReportError::data(row, &ticker, column, "missing value"));
                }
                return Ok(0.0);
            }
            let value = text.parse::<f64>().map_err(|_| {
                ReportError::data(row, &ticker, column, format!("invalid number {:?}", text))
            })?;
            if !value.is_finite() {
                return Err(ReportError::data(
                    row,
                    &ticker,
                    column,
                    format!("non-finite number {:?}", text),
                ));
            }
            Ok(value)
        };

        let shares = number(field(cols.shares), SHARES_COLUMN, is_trade)?;
        let price_per_share = number(field(cols.price), PRICE_COLUMN, is_trade)?;
        let total = number(field(cols.total), TOTAL_COLUMN, true)?;
        let result = number(optional(cols.result), RESULT_COLUMN, false)?;
        let currency_conversion_fee = number(optional(cols.fee), FEE_COLUMN, false)?;
        let time = Some(optional(cols.time))
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(TradeEvent {
            row,
            time,
            action,
            ticker,
            shares,
            price_per_share,
            total,
            result,
            currency_conversion_fee,
        })
    }
}

impl<R: Read> EventSource for CsvExportReader<R> {
    fn next_event(&mut self) -> Result<Option<TradeEvent>> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }
        self.rows_read += 1;
        self.parse_record(self.rows_read).map(Some)
    }

    fn events_read(&self) -> usize {
        self.rows_read
    }
}
