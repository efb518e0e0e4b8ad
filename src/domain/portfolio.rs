//! Portfolio — aggregate run state: cash, open positions, closed trades, equity curve.

use super::equity::EquityPoint;
use super::position::Position;
use super::trade::ClosedTrade;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Aggregate portfolio state for a single run.
///
/// Invariant: `positions` holds at most one entry per code (spec §3).
/// `equity_curve` is appended once per simulated bar and is always
/// date-ordered (the backtest loop walks the timeline in order).
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub positions: HashMap<String, Position>,
    pub closed_trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            initial_capital,
            positions: HashMap::new(),
            closed_trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn has_position(&self, code: &str) -> bool {
        self.positions.contains_key(code)
    }

    pub fn position(&self, code: &str) -> Option<&Position> {
        self.positions.get(code)
    }

    /// Total equity given a map of code → last known price.
    ///
    /// `equity = cash + sum(|qty| * last_price)` over open positions
    /// (spec §3). A code missing from `prices` marks at entry price,
    /// matching the teacher's `Portfolio::equity` fallback
    /// (trendlab-core/src/domain/portfolio.rs).
    pub fn total_equity(&self, prices: &HashMap<String, f64>) -> f64 {
        let position_value: f64 = self
            .positions
            .values()
            .map(|p| {
                let price = prices.get(&p.code).copied().unwrap_or(p.entry_price);
                p.market_value(price)
            })
            .sum();
        self.cash + position_value
    }

    /// Append one equity-curve sample. Called once per bar from the loop.
    pub fn record_equity(&mut self, date: NaiveDate, equity: f64) {
        self.equity_curve.push(EquityPoint { date, equity });
    }
}
