use crate::domain::{
    group_by_symbol, sort_executions_chronological, sort_positions_by_entry, ClosedPosition,
    Direction, Execution, Symbol,
};
use rayon::prelude::*;
use rust_decimal::Decimal;

/// Running state of the position cycle in progress for one symbol.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CycleState {
    /// Net shares as an exact decimal: positive = long, negative = short,
    /// zero = flat.
    pub net_shares: Decimal,

    /// Fixed by the first fill that moves the cycle off zero (None if flat).
    pub direction: Option<Direction>,

    /// Opening-side fills in replay order.
    pub entries: Vec<Execution>,

    /// Closing-side fills in replay order.
    pub exits: Vec<Execution>,
}

impl CycleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_flat(&self) -> bool {
        self.direction.is_none()
    }

    /// Number of fills held by the unfinished cycle.
    pub fn pending_executions(&self) -> usize {
        self.entries.len() + self.exits.len()
    }

    /// Apply one fill and return the next state, plus the closed position if
    /// this fill brought net shares back to exactly zero.
    ///
    /// Callers must feed a single symbol's fills in chronological order.
    ///
    /// # Panics
    /// Panics if the execution's quantity is not a positive exact decimal
    /// (see [`Execution::exact_quantity`]). Records from [`Execution::new`]
    /// always pass.
    pub fn apply(mut self, execution: Execution) -> (CycleState, Option<ClosedPosition>) {
        let net_shares = self.net_shares + execution.signed_quantity();

        let direction = match self.direction {
            Some(direction) => direction,
            None => Direction::from_net_shares(net_shares)
                .expect("a positive quantity always moves a flat cycle off zero"),
        };

        if execution.side == direction.entry_side() {
            self.entries.push(execution);
        } else {
            self.exits.push(execution);
        }

        if net_shares.is_zero() {
            let symbol = self.entries[0].symbol.clone();
            let closed = ClosedPosition::from_sides(symbol, direction, self.entries, self.exits);
            return (CycleState::new(), Some(closed));
        }

        self.net_shares = net_shares;
        self.direction = Some(direction);
        (self, None)
    }
}

/// Result of replaying one symbol's executions.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolReplay {
    pub symbol: Symbol,
    /// Positions closed, in the order they closed.
    pub closed: Vec<ClosedPosition>,
    /// Cycle left open at the end of the ledger; its fills are discarded.
    pub open: CycleState,
}

/// Sort one symbol's executions and fold them through [`CycleState::apply`].
pub fn replay_symbol(symbol: Symbol, mut executions: Vec<Execution>) -> SymbolReplay {
    sort_executions_chronological(&mut executions);

    let mut closed = Vec::new();
    let mut state = CycleState::new();
    for execution in executions {
        let (next, position) = state.apply(execution);
        state = next;
        if let Some(position) = position {
            tracing::debug!(
                symbol = %position.symbol,
                direction = %position.direction,
                shares = position.share_count,
                entry_time = %position.entry_time,
                exit_time = %position.exit_time,
                "Closed position"
            );
            closed.push(position);
        }
    }

    if !state.is_flat() {
        tracing::debug!(
            symbol = %symbol,
            net_shares = %state.net_shares,
            discarded = state.pending_executions(),
            "Dropping unclosed position"
        );
    }

    SymbolReplay {
        symbol,
        closed,
        open: state,
    }
}

/// Counters describing one matching run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchStats {
    pub executions: usize,
    pub symbols: usize,
    pub closed: usize,
    /// Symbols whose ledger ends with a position still open.
    pub unclosed_symbols: usize,
    /// Fills belonging to those unfinished positions.
    pub discarded_executions: usize,
}

/// Closed positions ordered by entry time, with run statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub positions: Vec<ClosedPosition>,
    pub stats: MatchStats,
}

/// Groups a ledger by symbol, replays each group and merges the results.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionMatcher {
    parallel: bool,
}

impl PositionMatcher {
    pub fn new() -> Self {
        Self { parallel: false }
    }

    /// Replay symbol groups on the rayon thread pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn match_positions(&self, executions: Vec<Execution>) -> MatchOutcome {
        let execution_count = executions.len();
        let groups = group_by_symbol(executions);

        // Indexed collect keeps group order, so both paths merge identically.
        let replays: Vec<SymbolReplay> = if self.parallel {
            groups
                .into_par_iter()
                .map(|(symbol, executions)| replay_symbol(symbol, executions))
                .collect()
        } else {
            groups
                .into_iter()
                .map(|(symbol, executions)| replay_symbol(symbol, executions))
                .collect()
        };

        let mut stats = MatchStats {
            executions: execution_count,
            symbols: replays.len(),
            ..MatchStats::default()
        };

        let mut positions = Vec::new();
        for replay in replays {
            if !replay.open.is_flat() {
                stats.unclosed_symbols += 1;
                stats.discarded_executions += replay.open.pending_executions();
            }
            positions.extend(replay.closed);
        }
        sort_positions_by_entry(&mut positions);
        stats.closed = positions.len();

        tracing::info!(
            executions = stats.executions,
            symbols = stats.symbols,
            closed = stats.closed,
            unclosed_symbols = stats.unclosed_symbols,
            discarded = stats.discarded_executions,
            "Matched positions"
        );

        MatchOutcome { positions, stats }
    }
}

/// Match a ledger into closed positions ordered by entry time.
pub fn match_positions(executions: Vec<Execution>) -> Vec<ClosedPosition> {
    PositionMatcher::new().match_positions(executions).positions
}

/// Same as [`match_positions`], replaying symbols in parallel.
pub fn match_positions_parallel(executions: Vec<Execution>) -> Vec<ClosedPosition> {
    PositionMatcher::new()
        .parallel(true)
        .match_positions(executions)
        .positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, 3, 12)
            .unwrap()
            .and_hms_opt(10, minute, 0)
            .unwrap()
    }

    fn exec(side: Side, qty: f64, px: f64, minute: u32) -> Execution {
        Execution::new(at(minute), Symbol::new("X"), side, qty, px, 0.0).unwrap()
    }

    #[test]
    fn test_apply_open_sets_direction() {
        let (state, closed) = CycleState::new().apply(exec(Side::Sell, 10.0, 20.0, 0));

        assert!(closed.is_none());
        assert_eq!(state.net_shares, Decimal::from(-10));
        assert_eq!(state.direction, Some(Direction::Short));
        assert_eq!(state.entries.len(), 1);
        assert!(state.exits.is_empty());
    }

    #[test]
    fn test_apply_close_resets_state() {
        let (state, _) = CycleState::new().apply(exec(Side::Buy, 10.0, 5.0, 0));
        let (state, closed) = state.apply(exec(Side::Sell, 10.0, 6.0, 1));

        assert!(state.is_flat());
        assert_eq!(state, CycleState::new());
        let closed = closed.unwrap();
        assert_eq!(closed.direction, Direction::Long);
        assert_eq!(closed.share_count, 10.0);
    }

    #[test]
    fn test_partial_exit_keeps_cycle_open() {
        let (state, _) = CycleState::new().apply(exec(Side::Buy, 10.0, 5.0, 0));
        let (state, closed) = state.apply(exec(Side::Sell, 4.0, 6.0, 1));

        assert!(closed.is_none());
        assert_eq!(state.net_shares, Decimal::from(6));
        assert_eq!(state.direction, Some(Direction::Long));
        assert_eq!(state.pending_executions(), 2);
    }

    #[test]
    fn test_crossing_zero_keeps_original_direction() {
        let (state, _) = CycleState::new().apply(exec(Side::Buy, 10.0, 5.0, 0));
        let (state, closed) = state.apply(exec(Side::Sell, 15.0, 6.0, 1));
        assert!(closed.is_none());
        assert_eq!(state.net_shares, Decimal::from(-5));
        assert_eq!(state.direction, Some(Direction::Long));

        let (state, closed) = state.apply(exec(Side::Buy, 5.0, 4.0, 2));
        let closed = closed.unwrap();
        assert!(state.is_flat());
        assert_eq!(closed.direction, Direction::Long);
        assert_eq!(closed.share_count, 15.0);
        assert_eq!(closed.entries.len(), 2);
        assert_eq!(closed.exits.len(), 1);
    }

    #[test]
    fn test_fractional_fills_net_to_exact_zero() {
        let (state, _) = CycleState::new().apply(exec(Side::Buy, 0.1, 5.0, 0));
        let (state, _) = state.apply(exec(Side::Buy, 0.2, 5.0, 1));
        assert_eq!(state.net_shares, Decimal::new(3, 1));

        let (state, closed) = state.apply(exec(Side::Sell, 0.3, 6.0, 2));
        assert!(closed.is_some());
        assert!(state.is_flat());
    }

    #[test]
    fn test_replay_symbol_sorts_before_folding() {
        let replay = replay_symbol(
            Symbol::new("X"),
            vec![exec(Side::Sell, 10.0, 6.0, 5), exec(Side::Buy, 10.0, 5.0, 1)],
        );

        assert_eq!(replay.closed.len(), 1);
        assert_eq!(replay.closed[0].direction, Direction::Long);
        assert!(replay.open.is_flat());
    }

    #[test]
    fn test_stats_count_unclosed() {
        let outcome = PositionMatcher::new().match_positions(vec![
            exec(Side::Buy, 10.0, 5.0, 0),
            exec(Side::Sell, 10.0, 6.0, 1),
            exec(Side::Buy, 3.0, 7.0, 2),
        ]);

        assert_eq!(outcome.positions.len(), 1);
        assert_eq!(
            outcome.stats,
            MatchStats {
                executions: 3,
                symbols: 1,
                closed: 1,
                unclosed_symbols: 1,
                discarded_executions: 1,
            }
        );
    }

    #[test]
    fn test_empty_ledger() {
        let outcome = PositionMatcher::new().match_positions(Vec::new());
        assert!(outcome.positions.is_empty());
        assert_eq!(outcome.stats, MatchStats::default());
    }
}
