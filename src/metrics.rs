//! Performance metrics — pure functions over closed trades and the equity
//! curve (spec §4.7 component H).

use crate::domain::{ClosedTrade, EquityPoint};
use serde::{Deserialize, Serialize};

/// Trading days per year, used to annualize daily statistics (spec §4.7).
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Trade-level and equity-curve-level statistics for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub profit_factor: f64,
    pub average_trade_duration: f64,
    pub total_return: f64,
    pub annualized_return: f64,
    pub sharpe: f64,
    pub sortino: f64,
    pub max_drawdown: f64,
    pub max_drawdown_duration: usize,
}

/// One code's slice of trade statistics (spec §4.7 "Per-code").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerCodeStats {
    pub total: usize,
    pub winning: usize,
    pub losing: usize,
    pub total_pnl: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub win_rate: f64,
}

/// Compute every aggregate metric in one pass (spec §4.7).
pub fn compute(trades: &[ClosedTrade], equity_curve: &[EquityPoint], risk_free_rate: f64) -> AggregateMetrics {
    let (trade_stats, trade_duration) = trade_metrics(trades);
    let curve_stats = equity_metrics(equity_curve, risk_free_rate);

    AggregateMetrics {
        total_trades: trade_stats.0,
        winning_trades: trade_stats.1,
        losing_trades: trade_stats.2,
        win_rate: trade_stats.3,
        average_win: trade_stats.4,
        average_loss: trade_stats.5,
        largest_win: trade_stats.6,
        largest_loss: trade_stats.7,
        profit_factor: trade_stats.8,
        average_trade_duration: trade_duration,
        total_return: curve_stats.0,
        annualized_return: curve_stats.1,
        sharpe: curve_stats.2,
        sortino: curve_stats.3,
        max_drawdown: curve_stats.4,
        max_drawdown_duration: curve_stats.5,
    }
}

#[allow(clippy::type_complexity)]
fn trade_metrics(trades: &[ClosedTrade]) -> ((usize, usize, usize, f64, f64, f64, f64, f64, f64), f64) {
    let total = trades.len();
    let winning: Vec<&ClosedTrade> = trades.iter().filter(|t| t.pnl > 0.0).collect();
    let losing: Vec<&ClosedTrade> = trades.iter().filter(|t| t.pnl <= 0.0).collect();

    let win_rate = if total > 0 {
        winning.len() as f64 / total as f64
    } else {
        0.0
    };

    let sum_wins: f64 = winning.iter().map(|t| t.pnl).sum();
    let sum_losses: f64 = losing.iter().map(|t| t.pnl).sum();

    let average_win = if !winning.is_empty() {
        sum_wins / winning.len() as f64
    } else {
        0.0
    };
    let average_loss = if !losing.is_empty() {
        sum_losses / losing.len() as f64
    } else {
        0.0
    };

    let largest_win = winning.iter().map(|t| t.pnl).fold(0.0, f64::max);
    let largest_loss = losing.iter().map(|t| t.pnl).fold(0.0, f64::min);

    let profit_factor = if sum_losses < 0.0 {
        sum_wins / sum_losses.abs()
    } else if sum_wins > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    let average_duration = if total > 0 {
        trades.iter().map(|t| t.duration_days() as f64).sum::<f64>() / total as f64
    } else {
        0.0
    };

    (
        (
            total,
            winning.len(),
            losing.len(),
            win_rate,
            average_win,
            average_loss,
            largest_win,
            largest_loss,
            profit_factor,
        ),
        average_duration,
    )
}

#[allow(clippy::type_complexity)]
fn equity_metrics(curve: &[EquityPoint], risk_free_rate: f64) -> (f64, f64, f64, f64, f64, usize) {
    let n = curve.len();
    if n == 0 {
        return (0.0, 0.0, 0.0, 0.0, 0.0, 0);
    }

    let first = curve[0].equity;
    let last = curve[n - 1].equity;
    let total_return = if first > 0.0 { (last - first) / first } else { 0.0 };

    let trading_days = n.saturating_sub(1);
    let annualized_return = if trading_days > 0 && total_return > -1.0 {
        (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / trading_days as f64) - 1.0
    } else {
        0.0
    };

    let mut returns = Vec::with_capacity(trading_days);
    for i in 0..trading_days {
        let e = curve[i].equity;
        let r = if e > 0.0 { (curve[i + 1].equity - e) / e } else { 0.0 };
        returns.push(r);
    }

    let rf_daily = risk_free_rate / TRADING_DAYS_PER_YEAR;
    let (sharpe, sortino) = if trading_days > 0 {
        let mean = returns.iter().sum::<f64>() / trading_days as f64;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / trading_days as f64;
        let stddev = variance.sqrt();
        // Downside deviation uses a zero minimum-acceptable-return threshold,
        // not the risk-free rate — only the Sharpe excess return subtracts rf.
        let downside_variance = returns.iter().map(|r| r.min(0.0).powi(2)).sum::<f64>() / trading_days as f64;
        let downside_dev = downside_variance.sqrt();

        let sharpe = if stddev > 0.0 {
            (mean - rf_daily) / stddev * TRADING_DAYS_PER_YEAR.sqrt()
        } else {
            0.0
        };
        let sortino = if downside_dev > 0.0 {
            mean / downside_dev * TRADING_DAYS_PER_YEAR.sqrt()
        } else {
            0.0
        };
        (sharpe, sortino)
    } else {
        (0.0, 0.0)
    };

    let (max_drawdown, max_drawdown_duration) = drawdown(curve);

    (total_return, annualized_return, sharpe, sortino, max_drawdown, max_drawdown_duration)
}

/// Walking-peak max drawdown and its duration (spec §4.7).
///
/// Duration only accumulates across a genuine underwater stretch — a bar
/// that sets a new all-time high the instant after the prior one does not
/// count as a one-bar "drawdown" (boundary test: monotonic-increasing
/// equity has zero duration, not one bar per step).
fn drawdown(curve: &[EquityPoint]) -> (f64, usize) {
    if curve.is_empty() {
        return (0.0, 0);
    }
    let mut peak = curve[0].equity;
    let mut peak_idx = 0usize;
    let mut underwater = false;
    let mut max_dd = 0.0f64;
    let mut max_duration = 0usize;

    for i in 1..curve.len() {
        let e = curve[i].equity;
        if peak > 0.0 {
            max_dd = max_dd.max((peak - e) / peak);
        }
        if e > peak {
            if underwater {
                max_duration = max_duration.max(i - peak_idx);
            }
            peak = e;
            peak_idx = i;
            underwater = false;
        } else {
            underwater = true;
        }
    }
    if underwater {
        max_duration = max_duration.max(curve.len() - 1 - peak_idx);
    }
    (max_dd, max_duration)
}

/// Bucket closed trades by exact `code` match, skipping trades whose code is
/// not in `codes` (spec §4.7 "Per-code").
pub fn per_code(trades: &[ClosedTrade], codes: &[String]) -> Vec<(String, PerCodeStats)> {
    codes
        .iter()
        .map(|code| {
            let bucket: Vec<&ClosedTrade> = trades.iter().filter(|t| &t.code == code).collect();
            let total = bucket.len();
            let winning: Vec<&&ClosedTrade> = bucket.iter().filter(|t| t.pnl > 0.0).collect();
            let losing: Vec<&&ClosedTrade> = bucket.iter().filter(|t| t.pnl <= 0.0).collect();
            let total_pnl: f64 = bucket.iter().map(|t| t.pnl).sum();
            let largest_win = winning.iter().map(|t| t.pnl).fold(0.0, f64::max);
            let largest_loss = losing.iter().map(|t| t.pnl).fold(0.0, f64::min);
            let win_rate = if total > 0 { winning.len() as f64 / total as f64 } else { 0.0 };
            (
                code.clone(),
                PerCodeStats {
                    total,
                    winning: winning.len(),
                    losing: losing.len(),
                    total_pnl,
                    largest_win,
                    largest_loss,
                    win_rate,
                },
            )
        })
        .collect()
}
