//! Pure computation engine: date repair and round-trip position matching.

pub mod normalizer;
pub mod position_matcher;

pub use normalizer::{normalize, normalize_with, DateFix, DEFAULT_THRESHOLD};
pub use position_matcher::{
    match_positions, match_positions_parallel, replay_symbol, CycleState, MatchOutcome,
    MatchStats, PositionMatcher, SymbolReplay,
};
