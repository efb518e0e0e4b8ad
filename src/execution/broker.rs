//! Order entry/exit and the stop-loss/take-profit sweep (spec §4.4).
//!
//! These are free functions over `&mut Portfolio` rather than methods, since
//! they also need the run's fee model and the current date — keeping them
//! outside `domain::Portfolio` keeps that module a pure data/invariant type.

use super::cost::{share_quantity, FeeModel};
use crate::domain::{ClosedTrade, Portfolio, Position};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Open a long position. Returns `false` (no error, no mutation) if a
/// position already exists for `code`, `max_positions` is already reached,
/// or the computed fill cannot be afforded.
pub fn enter_long(
    portfolio: &mut Portfolio,
    code: &str,
    exchange: &str,
    price: f64,
    date: NaiveDate,
    size_frac: f64,
    sl_pct: f64,
    tp_pct: f64,
    max_positions: usize,
    fees: &FeeModel,
) -> bool {
    if portfolio.has_position(code) || portfolio.positions.len() >= max_positions {
        return false;
    }
    let exec = fees.slip(price, true);
    let qty = share_quantity(portfolio.cash * size_frac, exec);
    if qty <= 0 {
        return false;
    }
    let notional = qty as f64 * exec;
    let commission = fees.commission(notional);
    if notional + commission > portfolio.cash {
        return false;
    }

    let stop_loss = if sl_pct > 0.0 { exec * (1.0 - sl_pct / 100.0) } else { 0.0 };
    let take_profit = if tp_pct > 0.0 { exec * (1.0 + tp_pct / 100.0) } else { 0.0 };

    portfolio.cash -= notional + commission;
    portfolio.positions.insert(
        code.to_string(),
        Position {
            code: code.to_string(),
            exchange: exchange.to_string(),
            quantity: qty,
            entry_price: exec,
            entry_date: date,
            stop_loss,
            take_profit,
        },
    );
    true
}

/// Open a short position — mirror of [`enter_long`]: exec price is pushed
/// down, proceeds are credited, commission debited.
pub fn enter_short(
    portfolio: &mut Portfolio,
    code: &str,
    exchange: &str,
    price: f64,
    date: NaiveDate,
    size_frac: f64,
    sl_pct: f64,
    tp_pct: f64,
    max_positions: usize,
    fees: &FeeModel,
) -> bool {
    if portfolio.has_position(code) || portfolio.positions.len() >= max_positions {
        return false;
    }
    let exec = fees.slip(price, false);
    let qty = share_quantity(portfolio.cash * size_frac, exec);
    if qty <= 0 {
        return false;
    }
    let notional = qty as f64 * exec;
    let commission = fees.commission(notional);

    let stop_loss = if sl_pct > 0.0 { exec * (1.0 + sl_pct / 100.0) } else { 0.0 };
    let take_profit = if tp_pct > 0.0 { exec * (1.0 - tp_pct / 100.0) } else { 0.0 };

    portfolio.cash += notional - commission;
    portfolio.positions.insert(
        code.to_string(),
        Position {
            code: code.to_string(),
            exchange: exchange.to_string(),
            quantity: -qty,
            entry_price: exec,
            entry_date: date,
            stop_loss,
            take_profit,
        },
    );
    true
}

/// Close whatever position is open for `code` at `price`, recording a
/// [`ClosedTrade`]. Returns `None` if no position is open for `code`.
pub fn exit_position(
    portfolio: &mut Portfolio,
    code: &str,
    price: f64,
    date: NaiveDate,
    fees: &FeeModel,
) -> Option<ClosedTrade> {
    let position = portfolio.positions.remove(code)?;
    let qty_abs = position.quantity.unsigned_abs() as f64;
    let entry_commission = fees.commission(qty_abs * position.entry_price);

    let (exec, exit_commission) = if position.is_long() {
        let exec = fees.slip(price, false);
        let commission = fees.commission(qty_abs * exec);
        portfolio.cash += qty_abs * exec - commission;
        (exec, commission)
    } else {
        let exec = fees.slip(price, true);
        let commission = fees.commission(qty_abs * exec);
        portfolio.cash -= qty_abs * exec + commission;
        (exec, commission)
    };

    let pnl = position.quantity as f64 * (exec - position.entry_price) - entry_commission - exit_commission;

    let trade = ClosedTrade {
        code: position.code.clone(),
        exchange: position.exchange.clone(),
        quantity: position.quantity,
        entry_price: position.entry_price,
        exit_price: exec,
        entry_date: position.entry_date,
        exit_date: date,
        pnl,
    };
    portfolio.closed_trades.push(trade.clone());
    Some(trade)
}

/// Two-pass stop-loss/take-profit sweep: collect triggered codes, then exit
/// each at its current price. Returns the number of positions closed.
pub fn trigger_sweep(
    portfolio: &mut Portfolio,
    price_map: &HashMap<String, f64>,
    date: NaiveDate,
    fees: &FeeModel,
) -> usize {
    let triggered: Vec<String> = portfolio
        .positions
        .iter()
        .filter_map(|(code, pos)| {
            let price = *price_map.get(code)?;
            if pos.should_stop_loss(price) || pos.should_take_profit(price) {
                Some(code.clone())
            } else {
                None
            }
        })
        .collect();

    let mut exited = 0;
    for code in triggered {
        if let Some(&price) = price_map.get(&code) {
            if exit_position(portfolio, &code, price, date, fees).is_some() {
                exited += 1;
            }
        }
    }
    exited
}
