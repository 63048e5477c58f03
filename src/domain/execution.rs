//! Execution type representing a single fill from the trade ledger.

use crate::domain::{Side, Symbol};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Reasons an execution record is rejected before matching.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    #[error("symbol must not be empty")]
    EmptySymbol,
    #[error("unknown side label: {0:?}")]
    UnknownSide(String),
    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(f64),
    #[error("price must be positive, got {0}")]
    NonPositivePrice(f64),
    #[error("commission must not be negative, got {0}")]
    NegativeCommission(f64),
    #[error("{0} must be a finite number")]
    NonFiniteValue(&'static str),
    #[error("quantity {0} has no exact decimal form")]
    UnrepresentableQuantity(f64),
}

/// Exact decimal reading of a quantity, taken from its shortest round-trip
/// text so that `0.1 + 0.2 - 0.3` nets to zero.
fn exact_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_str(&value.to_string())
        .ok()
        .filter(|d| !d.is_zero())
}

/// A single timestamped buy or sell fill for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    /// Local date-time of the fill.
    pub timestamp: NaiveDateTime,
    /// Instrument identifier.
    pub symbol: Symbol,
    /// Buy or Sell.
    pub side: Side,
    /// Shares/contracts filled (always > 0).
    pub quantity: f64,
    /// Price per share.
    pub price: f64,
    /// Fee charged for this fill.
    pub commission: f64,
}

impl Execution {
    /// Create a validated Execution.
    ///
    /// # Errors
    /// Returns an [`ExecutionError`] if any field breaks the record invariants:
    /// empty symbol, non-finite numbers, `quantity <= 0`, `price <= 0` or
    /// `commission < 0`, or a quantity too large or too fine to hold as an
    /// exact decimal.
    pub fn new(
        timestamp: NaiveDateTime,
        symbol: Symbol,
        side: Side,
        quantity: f64,
        price: f64,
        commission: f64,
    ) -> Result<Self, ExecutionError> {
        if symbol.is_empty() {
            return Err(ExecutionError::EmptySymbol);
        }
        for (name, value) in [
            ("quantity", quantity),
            ("price", price),
            ("commission", commission),
        ] {
            if !value.is_finite() {
                return Err(ExecutionError::NonFiniteValue(name));
            }
        }
        if quantity <= 0.0 {
            return Err(ExecutionError::NonPositiveQuantity(quantity));
        }
        if exact_decimal(quantity).is_none() {
            return Err(ExecutionError::UnrepresentableQuantity(quantity));
        }
        if price <= 0.0 {
            return Err(ExecutionError::NonPositivePrice(price));
        }
        if commission < 0.0 {
            return Err(ExecutionError::NegativeCommission(commission));
        }

        Ok(Execution {
            timestamp,
            symbol,
            side,
            quantity,
            price,
            commission,
        })
    }

    /// Same execution with a replaced timestamp.
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Quantity as an exact decimal, used for share netting.
    ///
    /// # Panics
    /// Panics if the quantity is not positive or has no exact decimal form.
    /// [`Execution::new`] rejects both, so this only fires for records built
    /// field by field.
    pub fn exact_quantity(&self) -> Decimal {
        match exact_decimal(self.quantity) {
            Some(quantity) if quantity.is_sign_positive() => quantity,
            _ => panic!("execution quantity {} is not a positive exact decimal", self.quantity),
        }
    }

    /// Signed share delta: Buy = +quantity, Sell = -quantity.
    pub fn signed_quantity(&self) -> Decimal {
        self.side.signed(self.exact_quantity())
    }

    /// quantity * price
    pub fn notional(&self) -> f64 {
        self.quantity * self.price
    }
}
