//! Position — a single open holding in one instrument.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An open position. `quantity > 0` is long, `quantity < 0` is short.
///
/// `stop_loss == 0.0` and `take_profit == 0.0` mean "unset" (spec §3).
/// `code`/`exchange` are owned copies — independent of any caller buffer,
/// so the run's data outlives whatever string the data port handed us
/// (spec §5, "strings as values").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub code: String,
    pub exchange: String,
    pub quantity: i64,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.quantity > 0
    }

    pub fn is_short(&self) -> bool {
        self.quantity < 0
    }

    /// Unrealized PnL at the given mark price (before any commission).
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity as f64 * (price - self.entry_price)
    }

    /// Absolute market value at the given price.
    pub fn market_value(&self, price: f64) -> f64 {
        (self.quantity.unsigned_abs() as f64) * price
    }

    /// Whether the current price trips the stop-loss. Always false when unset.
    pub fn should_stop_loss(&self, price: f64) -> bool {
        if self.stop_loss == 0.0 {
            return false;
        }
        if self.is_long() {
            price <= self.stop_loss
        } else {
            price >= self.stop_loss
        }
    }

    /// Whether the current price trips the take-profit. Always false when unset.
    pub fn should_take_profit(&self, price: f64) -> bool {
        if self.take_profit == 0.0 {
            return false;
        }
        if self.is_long() {
            price >= self.take_profit
        } else {
            price <= self.take_profit
        }
    }
}
