//! Stable ordering and grouping for deterministic matching.
//!
//! Every sort here is stable. Executions sharing a timestamp keep their ledger
//! order, which decides which cycle absorbs a simultaneous fill.

use crate::domain::{ClosedPosition, Execution, Symbol};
use std::collections::HashMap;

/// Sort executions by timestamp ascending; ties keep ledger order.
pub fn sort_executions_chronological(executions: &mut [Execution]) {
    executions.sort_by_key(|e| e.timestamp);
}

/// Sort closed positions by entry time ascending; ties keep input order.
pub fn sort_positions_by_entry(positions: &mut [ClosedPosition]) {
    positions.sort_by_key(|p| p.entry_time);
}

/// Partition executions by symbol.
///
/// Groups are returned in order of each symbol's first appearance and each
/// group keeps ledger order, so downstream output never depends on hash order.
pub fn group_by_symbol(executions: Vec<Execution>) -> Vec<(Symbol, Vec<Execution>)> {
    let mut index: HashMap<Symbol, usize> = HashMap::new();
    let mut groups: Vec<(Symbol, Vec<Execution>)> = Vec::new();

    for execution in executions {
        match index.get(&execution.symbol) {
            Some(&slot) => groups[slot].1.push(execution),
            None => {
                index.insert(execution.symbol.clone(), groups.len());
                groups.push((execution.symbol.clone(), vec![execution]));
            }
        }
    }

    groups
}
