//! In-memory ledger for testing without files.

use super::{ExecutionSource, LedgerError};
use crate::domain::Execution;

/// Ledger that returns predefined executions.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    executions: Vec<Execution>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an execution to the ledger.
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.executions.push(execution);
        self
    }

    /// Add multiple executions to the ledger.
    pub fn with_executions(mut self, executions: Vec<Execution>) -> Self {
        self.executions.extend(executions);
        self
    }
}

impl ExecutionSource for MemoryLedger {
    fn load_executions(&self) -> Result<Vec<Execution>, LedgerError> {
        Ok(self.executions.clone())
    }
}
