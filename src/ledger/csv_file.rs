//! Parsing the tabular execution ledger from CSV.
//!
//! Expected headers: `DateTime, Symbol, Action, Number of Shares, Price,
//! Commissions`. Rows with an empty symbol are skipped.

use super::{ExecutionSource, LedgerError};
use crate::domain::{Execution, Side, Symbol};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Date given to time-only cells (the spreadsheet epoch). The normalizer moves
/// these onto the processing date.
pub const SENTINEL_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1899, 12, 30) {
    Some(date) => date,
    None => panic!("invalid sentinel date"),
};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M:%S %p"];

/// CSV ledger on disk.
#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExecutionSource for CsvLedger {
    fn load_executions(&self) -> Result<Vec<Execution>, LedgerError> {
        read_ledger(&self.path)
    }
}

/// Read and validate a ledger file.
pub fn read_ledger(path: impl AsRef<Path>) -> Result<Vec<Execution>, LedgerError> {
    let file = std::fs::File::open(path.as_ref())?;
    let executions = parse_ledger(file)?;
    tracing::info!(
        path = %path.as_ref().display(),
        executions = executions.len(),
        "Loaded execution ledger"
    );
    Ok(executions)
}

/// Parse ledger rows into validated executions, in ledger order.
pub fn parse_ledger<R: Read>(reader: R) -> Result<Vec<Execution>, LedgerError> {
    #[derive(Debug, serde::Deserialize)]
    struct Row {
        #[serde(rename = "DateTime", default)]
        date_time: String,
        #[serde(rename = "Symbol", default)]
        symbol: String,
        #[serde(rename = "Action", default)]
        action: String,
        #[serde(rename = "Number of Shares", default)]
        quantity: String,
        #[serde(rename = "Price", default)]
        price: String,
        #[serde(rename = "Commissions", default)]
        commission: String,
    }

    fn parse_number(row: usize, field: &'static str, value: &str) -> Result<f64, LedgerError> {
        value.parse::<f64>().map_err(|_| LedgerError::InvalidNumber {
            row,
            field,
            value: value.to_string(),
        })
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut executions = Vec::new();
    let mut skipped = 0usize;
    for (index, record) in reader.deserialize::<Row>().enumerate() {
        let row = index + 1;
        let record = record.map_err(|e| LedgerError::Csv {
            row,
            message: e.to_string(),
        })?;

        if record.symbol.is_empty() {
            skipped += 1;
            continue;
        }

        let timestamp =
            parse_timestamp(&record.date_time).ok_or_else(|| LedgerError::InvalidTimestamp {
                row,
                value: record.date_time.clone(),
            })?;
        let side = record
            .action
            .parse::<Side>()
            .map_err(|source| LedgerError::MalformedRow { row, source })?;
        let quantity = parse_number(row, "quantity", &record.quantity)?;
        let price = parse_number(row, "price", &record.price)?;
        let commission = if record.commission.is_empty() {
            0.0
        } else {
            parse_number(row, "commission", &record.commission)?
        };

        let execution = Execution::new(
            timestamp,
            Symbol::new(record.symbol),
            side,
            quantity,
            price,
            commission,
        )
        .map_err(|source| LedgerError::MalformedRow { row, source })?;
        executions.push(execution);
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped ledger rows without a symbol");
    }

    Ok(executions)
}

/// Parse a ledger timestamp. Time-only values land on [`SENTINEL_DATE`].
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            TIME_FORMATS
                .iter()
                .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
                .map(|time| SENTINEL_DATE.and_time(time))
        })
}
