pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod pipeline;
pub mod report;

pub use config::{Action, Config};
pub use domain::{ClosedPosition, Direction, Execution, ExecutionError, Side, Symbol};
pub use engine::{match_positions, match_positions_parallel, normalize, normalize_with, DateFix};
pub use error::AppError;
pub use ledger::{CsvLedger, ExecutionSource, LedgerError, MemoryLedger};
