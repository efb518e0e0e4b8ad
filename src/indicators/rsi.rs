//! Relative Strength Index — Wilder smoothing of average gain/loss.
//!
//! Seed at `i = period` from the mean of the first `period` gains/losses
//! (changes at indices `1..=period`). Thereafter Wilder: `avg = (prev*(p-1)+cur)/p`.
//! `RSI = 100 - 100/(1 + avg_gain/avg_loss)`, with `avg_loss == 0` special-cased
//! to 50 (no movement) or 100 (all gains). Invalid for `i < period`.

use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar], period: usize) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("RSI: empty bar vector".into()));
    }
    if period < 1 {
        return Err(EngineError::RuleInvalid("RSI: period must be >= 1".into()));
    }

    let n = bars.len();
    let mut series = IndicatorSeries::invalid_of_kind(IndicatorKind::Rsi, bars, (period, 0, 0));
    if n < period + 1 {
        return Ok(series);
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = bars[i].close - bars[i - 1].close;
        avg_gain += change.max(0.0);
        avg_loss += (-change).max(0.0);
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    series.values[period] = IndicatorPoint {
        date: bars[period].date,
        valid: true,
        value: IndicatorValue::Simple {
            value: rsi_from_averages(avg_gain, avg_loss),
        },
    };

    for i in (period + 1)..n {
        let change = bars[i].close - bars[i - 1].close;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;

        series.values[i] = IndicatorPoint {
            date: bars[i].date,
            valid: true,
            value: IndicatorValue::Simple {
                value: rsi_from_averages(avg_gain, avg_loss),
            },
        };
    }

    Ok(series)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
