//! Per-code indicator cache — compute each distinct indicator operand once
//! per code and share it across every rule that references it (spec §2
//! component J, §4.2 "Operand fingerprint key").

use crate::domain::Bar;
use crate::error::Result;
use crate::indicators::{self, IndicatorKind, IndicatorSeries};
use crate::rule::{Operand, Rule};
use std::collections::HashMap;

/// Walk a rule tree, collecting every `Operand::Indicator` leaf it references.
fn collect_indicator_operands<'a>(rule: &'a Rule, out: &mut Vec<&'a Operand>) {
    match rule {
        Rule::Comparison { left, right, .. } => {
            collect_operand(left, out);
            collect_operand(right, out);
        }
        Rule::Between { value, .. } => collect_operand(value, out),
        Rule::Composite { children, .. } => {
            for child in children {
                collect_indicator_operands(child, out);
            }
        }
        Rule::Not { child } => collect_indicator_operands(child, out),
        Rule::Temporal { child, .. } => collect_indicator_operands(child, out),
    }
}

fn collect_operand<'a>(operand: &'a Operand, out: &mut Vec<&'a Operand>) {
    if matches!(operand, Operand::Indicator { .. }) {
        out.push(operand);
    }
}

/// Compute (or reuse) the [`IndicatorSeries`] for one operand.
fn compute_series(bars: &[Bar], operand: &Operand) -> Result<IndicatorSeries> {
    let Operand::Indicator {
        kind,
        period,
        param2,
        param3,
        ..
    } = operand
    else {
        unreachable!("compute_series called on a non-indicator operand");
    };
    match kind {
        IndicatorKind::Sma => indicators::sma::compute(bars, *period),
        IndicatorKind::Ema => indicators::ema::compute(bars, *period),
        IndicatorKind::Wma => indicators::wma::compute(bars, *period),
        IndicatorKind::Rsi => indicators::rsi::compute(bars, *period),
        IndicatorKind::Roc => indicators::roc::compute(bars, *period),
        IndicatorKind::Atr => indicators::atr::compute(bars, *period),
        IndicatorKind::Stddev => indicators::stddev::compute(bars, *period),
        IndicatorKind::Obv => indicators::obv::compute(bars),
        IndicatorKind::Vwap => indicators::vwap::compute(bars),
        IndicatorKind::Macd => indicators::macd::compute(bars, *period, *param2 as usize, *param3 as usize),
        IndicatorKind::Stochastic => indicators::stochastic::compute(bars, *period, *param2 as usize),
        IndicatorKind::Bollinger => indicators::bollinger::compute(bars, *period, *param2 as f64 / 100.0),
        IndicatorKind::Pivot => indicators::pivot::compute(bars),
    }
}

/// Build the fingerprint → series map for one code, given every rule that
/// may reference an indicator over its bars. Each distinct fingerprint is
/// computed exactly once, regardless of how many rules reference it.
pub fn build_indicator_cache(bars: &[Bar], rules: &[&Rule]) -> Result<HashMap<String, IndicatorSeries>> {
    let mut operands = Vec::new();
    for rule in rules {
        collect_indicator_operands(rule, &mut operands);
    }

    let mut cache = HashMap::new();
    for operand in operands {
        let fingerprint = operand.fingerprint();
        if cache.contains_key(&fingerprint) {
            continue;
        }
        let series = compute_series(bars, operand)?;
        cache.insert(fingerprint, series);
    }
    Ok(cache)
}
