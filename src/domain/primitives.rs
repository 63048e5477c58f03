//! Domain primitives: Symbol, Side, Direction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::Neg;
use std::str::FromStr;

use super::ExecutionError;

/// Instrument identifier (e.g., "AAPL", "ES"). Case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    /// Create a Symbol from a string.
    pub fn new(symbol: impl Into<String>) -> Self {
        Symbol(symbol.into())
    }

    /// Get the symbol as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Execution side: Buy or Sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bought shares (ledger label `BOT`).
    Buy,
    /// Sold shares (ledger label `SLD`).
    Sell,
}

impl Side {
    /// Apply this side's sign to a quantity: Buy = +qty, Sell = -qty.
    pub fn signed<T: Neg<Output = T>>(&self, quantity: T) -> T {
        match self {
            Side::Buy => quantity,
            Side::Sell => -quantity,
        }
    }
}

impl FromStr for Side {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOT" | "BUY" | "B" => Ok(Side::Buy),
            "SLD" | "SELL" | "S" => Ok(Side::Sell),
            _ => Err(ExecutionError::UnknownSide(s.to_string())),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Direction of a round-trip position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Opened by buying; buys are entries, sells are exits.
    Long,
    /// Opened by selling short; sells are entries, buys are exits.
    Short,
}

impl Direction {
    /// Direction implied by the sign of a non-zero net share count.
    pub fn from_net_shares(net_shares: Decimal) -> Option<Self> {
        if net_shares.is_zero() {
            None
        } else if net_shares.is_sign_positive() {
            Some(Direction::Long)
        } else {
            Some(Direction::Short)
        }
    }

    /// The side whose executions open a position in this direction.
    pub fn entry_side(&self) -> Side {
        match self {
            Direction::Long => Side::Buy,
            Direction::Short => Side::Sell,
        }
    }

    /// Human-readable label used by the summary table.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}
