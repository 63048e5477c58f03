use crate::config::ConfigError;
use crate::ledger::LedgerError;
use crate::report::ReportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}
