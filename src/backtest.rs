//! The bar-stepping backtest loop (spec §4.5 component G).

use crate::cache::build_indicator_cache;
use crate::domain::Portfolio;
use crate::error::Result;
use crate::execution::{self, FeeModel};
use crate::indicators::IndicatorSeries;
use crate::rule::{self, Rule};
use crate::strategy::Strategy;
use crate::universe::CodeData;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Run a strategy over a merged universe timeline and return the finished
/// portfolio (equity curve, closed trades, final positions).
///
/// For each date, in order: build the close-price snapshot, sweep
/// stop-loss/take-profit triggers, then per code in universe order evaluate
/// exit before entry, then mark equity. See spec §4.5 for the exact
/// ordering guarantees this loop must preserve.
pub fn run(codes: &[CodeData], timeline: &[NaiveDate], strategy: &Strategy, fees: &FeeModel, initial_capital: f64) -> Result<Portfolio> {
    let mut portfolio = Portfolio::new(initial_capital);
    let caches = build_caches(codes, strategy)?;

    for &date in timeline {
        let price_map = price_snapshot(codes, date);
        execution::trigger_sweep(&mut portfolio, &price_map, date, fees);

        for code in codes {
            let Some(&idx) = code.date_to_index.get(&date) else {
                continue;
            };
            let cache = &caches[code.code.as_str()];
            let close = code.bars[idx].close;
            let exchange = code.bars[idx].exchange.as_str();

            step_code(&mut portfolio, code, cache, idx, close, exchange, strategy, fees, date);
        }

        let equity = portfolio.total_equity(&price_map);
        portfolio.record_equity(date, equity);
    }

    Ok(portfolio)
}

/// Build each code's indicator cache once, up front, over the full rule set
/// the strategy may evaluate (entry/exit, long/short).
fn build_caches<'a>(codes: &'a [CodeData], strategy: &Strategy) -> Result<HashMap<&'a str, HashMap<String, IndicatorSeries>>> {
    let mut rules: Vec<&Rule> = vec![&strategy.entry_long, &strategy.exit_long];
    if let Some(r) = &strategy.entry_short {
        rules.push(r);
    }
    if let Some(r) = &strategy.exit_short {
        rules.push(r);
    }

    let mut caches = HashMap::new();
    for code in codes {
        let cache = build_indicator_cache(&code.bars, &rules)?;
        caches.insert(code.code.as_str(), cache);
    }
    Ok(caches)
}

/// Close price for every code with a bar on `date`.
fn price_snapshot(codes: &[CodeData], date: NaiveDate) -> HashMap<String, f64> {
    let mut prices = HashMap::new();
    for code in codes {
        if let Some(&idx) = code.date_to_index.get(&date) {
            prices.insert(code.code.clone(), code.bars[idx].close);
        }
    }
    prices
}

/// Exit-then-entry decision for one code on one bar (spec §4.5 step 3).
#[allow(clippy::too_many_arguments)]
fn step_code(
    portfolio: &mut Portfolio,
    code: &CodeData,
    cache: &HashMap<String, IndicatorSeries>,
    idx: usize,
    close: f64,
    exchange: &str,
    strategy: &Strategy,
    fees: &FeeModel,
    date: NaiveDate,
) {
    if let Some(position) = portfolio.position(&code.code) {
        let exit_rule = if position.is_long() {
            Some(&strategy.exit_long)
        } else {
            strategy.exit_short.as_ref()
        };
        if let Some(rule) = exit_rule {
            if rule::evaluate(rule, &code.bars, cache, idx) {
                execution::exit_position(portfolio, &code.code, close, date, fees);
            }
        }
        return;
    }

    if portfolio.positions.len() >= strategy.max_positions {
        return;
    }

    // Long-before-short: a firing entry_long always takes precedence over
    // entry_short on the same bar (spec §4.5's pinned default — a tie is
    // resolved by whichever side's own entry rule is first honored).
    let entered_long = rule::evaluate(&strategy.entry_long, &code.bars, cache, idx)
        && execution::enter_long(
            portfolio,
            &code.code,
            exchange,
            close,
            date,
            strategy.position_size,
            strategy.stop_loss_pct,
            strategy.take_profit_pct,
            strategy.max_positions,
            fees,
        );
    if entered_long {
        return;
    }

    if let Some(entry_short) = &strategy.entry_short {
        if rule::evaluate(entry_short, &code.bars, cache, idx) {
            execution::enter_short(
                portfolio,
                &code.code,
                exchange,
                close,
                date,
                strategy.position_size,
                strategy.stop_loss_pct,
                strategy.take_profit_pct,
                strategy.max_positions,
                fees,
            );
        }
    }
}
