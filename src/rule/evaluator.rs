//! Point-in-time rule evaluation (spec §4.3).
//!
//! `evaluate` is pure: it never mutates `bars` or `indicators`, and it never
//! reads `bars[j]` for `j > i` — callers may freely randomize bars after `i`
//! in property tests and expect identical results up to `i`.

use super::ast::{CompareOp, CompositeOp, Rule, TemporalOp};
use super::operand::{Field, Operand};
use crate::domain::Bar;
use crate::indicators::{IndicatorSeries, IndicatorValue};
use std::collections::HashMap;

/// Tolerance for `EQUALS` comparisons (spec §4.3).
const EPSILON: f64 = 1e-9;

/// Resolve an operand's value at bar index `i`, or `None` if it is out of
/// range or (for an indicator reference) still in its warmup window.
fn resolve(
    op: &Operand,
    bars: &[Bar],
    indicators: &HashMap<String, IndicatorSeries>,
    i: usize,
) -> Option<f64> {
    let bar = bars.get(i)?;
    match op {
        Operand::PriceOpen => Some(bar.open),
        Operand::PriceHigh => Some(bar.high),
        Operand::PriceLow => Some(bar.low),
        Operand::PriceClose => Some(bar.close),
        Operand::Volume => Some(bar.volume as f64),
        Operand::Constant(v) => Some(*v),
        Operand::Indicator { field, .. } => {
            let series = indicators.get(&op.fingerprint())?;
            let point = series.values.get(i)?;
            if !point.valid {
                return None;
            }
            resolve_field(&point.value, *field)
        }
    }
}

fn resolve_field(value: &IndicatorValue, field: Field) -> Option<f64> {
    match (value, field) {
        (IndicatorValue::Simple { value }, _) => Some(*value),
        (IndicatorValue::Macd { line, .. }, Field::Line) => Some(*line),
        (IndicatorValue::Macd { signal, .. }, Field::MacdSignal) => Some(*signal),
        (IndicatorValue::Macd { histogram, .. }, Field::MacdHistogram) => Some(*histogram),
        (IndicatorValue::Stochastic { k, .. }, Field::Line | Field::StochasticK) => Some(*k),
        (IndicatorValue::Stochastic { d, .. }, Field::StochasticD) => Some(*d),
        (IndicatorValue::Bollinger { upper, .. }, Field::BollingerUpper) => Some(*upper),
        (IndicatorValue::Bollinger { middle, .. }, Field::BollingerMiddle) => Some(*middle),
        (IndicatorValue::Bollinger { lower, .. }, Field::BollingerLower) => Some(*lower),
        (IndicatorValue::Pivot { pivot, .. }, Field::PivotP) => Some(*pivot),
        (IndicatorValue::Pivot { r1, .. }, Field::PivotR1) => Some(*r1),
        (IndicatorValue::Pivot { r2, .. }, Field::PivotR2) => Some(*r2),
        (IndicatorValue::Pivot { r3, .. }, Field::PivotR3) => Some(*r3),
        (IndicatorValue::Pivot { s1, .. }, Field::PivotS1) => Some(*s1),
        (IndicatorValue::Pivot { s2, .. }, Field::PivotS2) => Some(*s2),
        (IndicatorValue::Pivot { s3, .. }, Field::PivotS3) => Some(*s3),
        _ => None,
    }
}

/// Evaluate `rule` at bar index `i`. `indicators` maps operand fingerprint to
/// its precomputed series (spec §4.3).
pub fn evaluate(
    rule: &Rule,
    bars: &[Bar],
    indicators: &HashMap<String, IndicatorSeries>,
    i: usize,
) -> bool {
    match rule {
        Rule::Comparison { op, left, right } => evaluate_comparison(*op, left, right, bars, indicators, i),
        Rule::Between { value, lower, upper } => match resolve(value, bars, indicators, i) {
            Some(v) => *lower <= v && v <= *upper,
            None => false,
        },
        Rule::Composite { op, children } => match op {
            CompositeOp::And => children.iter().all(|c| evaluate(c, bars, indicators, i)),
            CompositeOp::Or => children.iter().any(|c| evaluate(c, bars, indicators, i)),
        },
        Rule::Not { child } => !evaluate(child, bars, indicators, i),
        Rule::Temporal { op, child, lookback } => {
            let lookback = (*lookback).max(1) as usize;
            match op {
                TemporalOp::Consecutive => {
                    if i + 1 < lookback {
                        return false;
                    }
                    let start = i + 1 - lookback;
                    (start..=i).all(|j| evaluate(child, bars, indicators, j))
                }
                TemporalOp::AnyOf => {
                    let start = i.saturating_sub(lookback - 1);
                    (start..=i).any(|j| evaluate(child, bars, indicators, j))
                }
            }
        }
    }
}

fn evaluate_comparison(
    op: CompareOp,
    left: &Operand,
    right: &Operand,
    bars: &[Bar],
    indicators: &HashMap<String, IndicatorSeries>,
    i: usize,
) -> bool {
    match op {
        CompareOp::CrossAbove | CompareOp::CrossBelow => {
            if i == 0 {
                return false;
            }
            let prev = (
                resolve(left, bars, indicators, i - 1),
                resolve(right, bars, indicators, i - 1),
            );
            let cur = (
                resolve(left, bars, indicators, i),
                resolve(right, bars, indicators, i),
            );
            let (Some(a_prev), Some(b_prev)) = prev else {
                return false;
            };
            let (Some(a_cur), Some(b_cur)) = cur else {
                return false;
            };
            if op == CompareOp::CrossAbove {
                a_prev <= b_prev && a_cur > b_cur
            } else {
                a_prev >= b_prev && a_cur < b_cur
            }
        }
        CompareOp::Above | CompareOp::Below | CompareOp::Equals => {
            let (Some(a), Some(b)) = (
                resolve(left, bars, indicators, i),
                resolve(right, bars, indicators, i),
            ) else {
                return false;
            };
            match op {
                CompareOp::Above => a > b,
                CompareOp::Below => a < b,
                CompareOp::Equals => (a - b).abs() < EPSILON,
                _ => unreachable!(),
            }
        }
    }
}
