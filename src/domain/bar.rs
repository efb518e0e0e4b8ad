//! Bar — the fundamental OHLCV market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily OHLCV bar for one instrument.
///
/// `code` and `exchange` identify the instrument; `date` is day-aligned
/// (no timezone semantics — see spec §6). Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub code: String,
    pub exchange: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Typical price: (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// True range against a previous close (Wilder's definition).
    ///
    /// `prev_close = None` (first bar in a series) reduces to `high - low`.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            None => self.high - self.low,
            Some(prev) => {
                let a = self.high - self.low;
                let b = (self.high - prev).abs();
                let c = (self.low - prev).abs();
                a.max(b).max(c)
            }
        }
    }

    /// True per spec's invariant: `low <= open, close <= high` and `low <= high`.
    ///
    /// Not enforced on input (see spec §3) — exposed so loaders and tests can
    /// check data quality without the core silently rejecting bad bars.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.low <= self.open
            && self.open <= self.high
            && self.low <= self.close
            && self.close <= self.high
            && self.low <= self.high
    }

    /// True if any OHLC field is non-finite.
    pub fn is_void(&self) -> bool {
        !self.open.is_finite() || !self.high.is_finite() || !self.low.is_finite() || !self.close.is_finite()
    }
}
