//! Execution ledger sources: where raw fills come from before matching.

use crate::domain::{Execution, ExecutionError};
use std::fmt;
use thiserror::Error;

pub mod csv_file;
pub mod memory;

pub use csv_file::{parse_ledger, parse_timestamp, read_ledger, CsvLedger, SENTINEL_DATE};
pub use memory::MemoryLedger;

/// Source of validated executions.
///
/// Implementations reject the whole ledger on the first malformed record;
/// a partially read ledger is never returned.
pub trait ExecutionSource: Send + Sync + fmt::Debug {
    fn load_executions(&self) -> Result<Vec<Execution>, LedgerError>;
}

/// Error type for ledger ingestion. Row numbers count data rows from 1.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error at row {row}: {message}")]
    Csv { row: usize, message: String },
    #[error("row {row}: unparseable timestamp {value:?}")]
    InvalidTimestamp { row: usize, value: String },
    #[error("row {row}: invalid {field} {value:?}")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("row {row}: {source}")]
    MalformedRow {
        row: usize,
        #[source]
        source: ExecutionError,
    },
}

impl LedgerError {
    /// Data row the error refers to, if any.
    pub fn row(&self) -> Option<usize> {
        match self {
            LedgerError::Io(_) => None,
            LedgerError::Csv { row, .. }
            | LedgerError::InvalidTimestamp { row, .. }
            | LedgerError::InvalidNumber { row, .. }
            | LedgerError::MalformedRow { row, .. } => Some(*row),
        }
    }
}
