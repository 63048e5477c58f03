//! Domain types for the round-trip trade ledger.
//!
//! This module provides:
//! - Domain primitives: Symbol, Side, Direction
//! - Validated Execution records and their rejection reasons
//! - ClosedPosition records with weighted-average aggregation
//! - Stable ordering/grouping helpers for deterministic matching

pub mod closed_position;
pub mod execution;
pub mod ordering;
pub mod primitives;

pub use closed_position::{total_quantity, weighted_average_price, ClosedPosition};
pub use execution::{Execution, ExecutionError};
pub use ordering::{group_by_symbol, sort_executions_chronological, sort_positions_by_entry};
pub use primitives::{Direction, Side, Symbol};
