//! Closed round-trip position built from the fills of one netting cycle.

use crate::domain::{Direction, Execution, Symbol};
use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A position that opened from flat and netted back to exactly zero shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedPosition {
    pub symbol: Symbol,
    pub direction: Direction,
    /// Time of the earliest entry fill.
    pub entry_time: NaiveDateTime,
    /// Time of the latest exit fill.
    pub exit_time: NaiveDateTime,
    /// Total entry-side quantity (equal to the exit-side total).
    pub share_count: f64,
    pub avg_entry_price: f64,
    pub avg_exit_price: f64,
    /// Commissions of every entry and exit fill.
    pub total_commission: f64,
    pub entries: Vec<Execution>,
    pub exits: Vec<Execution>,
}

impl ClosedPosition {
    /// Aggregate the two sides of a finished cycle.
    ///
    /// # Panics
    /// Panics if either side is empty or sums to zero quantity. A cycle that
    /// actually closed always has fills on both sides.
    pub fn from_sides(
        symbol: Symbol,
        direction: Direction,
        entries: Vec<Execution>,
        exits: Vec<Execution>,
    ) -> Self {
        let entry_time = entries
            .iter()
            .map(|e| e.timestamp)
            .min()
            .expect("closed position requires at least one entry");
        let exit_time = exits
            .iter()
            .map(|e| e.timestamp)
            .max()
            .expect("closed position requires at least one exit");

        let share_count = total_quantity(&entries);
        let avg_entry_price = weighted_average_price(&entries);
        let avg_exit_price = weighted_average_price(&exits);
        let total_commission = entries
            .iter()
            .chain(exits.iter())
            .map(|e| e.commission)
            .sum();

        ClosedPosition {
            symbol,
            direction,
            entry_time,
            exit_time,
            share_count,
            avg_entry_price,
            avg_exit_price,
            total_commission,
            entries,
            exits,
        }
    }

    /// Average price paid per share on the buy side.
    pub fn avg_buy_price(&self) -> f64 {
        match self.direction {
            Direction::Long => self.avg_entry_price,
            Direction::Short => self.avg_exit_price,
        }
    }

    /// Average price received per share on the sell side.
    pub fn avg_sell_price(&self) -> f64 {
        match self.direction {
            Direction::Long => self.avg_exit_price,
            Direction::Short => self.avg_entry_price,
        }
    }

    /// Buy-side fills, in replay order.
    pub fn buys(&self) -> &[Execution] {
        match self.direction {
            Direction::Long => &self.entries,
            Direction::Short => &self.exits,
        }
    }

    /// Sell-side fills, in replay order.
    pub fn sells(&self) -> &[Execution] {
        match self.direction {
            Direction::Long => &self.exits,
            Direction::Short => &self.entries,
        }
    }

    /// Profit before commissions.
    pub fn gross_pnl(&self) -> f64 {
        (self.avg_sell_price() - self.avg_buy_price()) * self.share_count
    }

    /// Profit after commissions.
    pub fn net_pnl(&self) -> f64 {
        self.gross_pnl() - self.total_commission
    }
}

/// Sum of quantities across fills, added as exact decimals.
///
/// Both sides of a closed cycle net to the same decimal total, so they
/// convert to the same `f64` whatever order the fills arrived in.
pub fn total_quantity(fills: &[Execution]) -> f64 {
    let total: Decimal = fills.iter().map(Execution::exact_quantity).sum();
    total
        .to_f64()
        .expect("a decimal share total always converts to f64")
}

/// Quantity-weighted mean price: sum(qty * price) / sum(qty).
///
/// # Panics
/// Panics when the total quantity is zero; the average is undefined there and
/// must never be coerced to 0 or NaN.
pub fn weighted_average_price(fills: &[Execution]) -> f64 {
    let quantity = total_quantity(fills);
    assert!(
        quantity > 0.0,
        "degenerate average: total quantity of {} fills is {}",
        fills.len(),
        quantity
    );
    let notional: f64 = fills.iter().map(Execution::notional).sum();
    notional / quantity
}
