//! ClosedTrade — an immutable record of a completed entry→exit round trip.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A closed trade. `pnl` is net of both entry and exit commission (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub code: String,
    pub exchange: String,
    pub quantity: i64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub pnl: f64,
}

impl ClosedTrade {
    pub fn is_long(&self) -> bool {
        self.quantity > 0
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    /// Holding period in whole days, `exit_date - entry_date`.
    pub fn duration_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClosedTrade {
        ClosedTrade {
            code: "CBA".into(),
            exchange: "ASX".into(),
            quantity: 100,
            entry_price: 100.0,
            exit_price: 110.0,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            exit_date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            pnl: 950.0,
        }
    }

    #[test]
    fn winner_detection() {
        assert!(sample().is_winner());
        let mut t = sample();
        t.pnl = -1.0;
        assert!(!t.is_winner());
    }

    #[test]
    fn duration_in_days() {
        assert_eq!(sample().duration_days(), 10);
    }

    #[test]
    fn closed_trade_serialization_roundtrip() {
        let trade = sample();
        let json = serde_json::to_string(&trade).unwrap();
        let back: ClosedTrade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, back);
    }
}
