//! Exponential Moving Average.
//!
//! `k = 2/(period+1)`. Seeded at `i = period-1` with the SMA of the first
//! `period` closes, then recursive: `ema[i] = close[i]*k + ema[i-1]*(1-k)`.
//! Invalid for `i < period-1`.

use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar], period: usize) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("EMA: empty bar vector".into()));
    }
    if period < 1 {
        return Err(EngineError::RuleInvalid("EMA: period must be >= 1".into()));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let raw = ema_of_series(&closes, period);

    let mut series = IndicatorSeries::invalid_of_kind(IndicatorKind::Ema, bars, (period, 0, 0));
    for (i, v) in raw.iter().enumerate() {
        if v.is_finite() {
            series.values[i] = IndicatorPoint {
                date: bars[i].date,
                valid: true,
                value: IndicatorValue::Simple { value: *v },
            };
        }
    }
    Ok(series)
}

/// EMA over a raw f64 series (used by MACD's line and signal, and by ATR/RSI's
/// Wilder smoothing analogues). Returns `NaN` for indices before `period-1`.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period < 1 || n < period {
        return result;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for (i, value) in result.iter_mut().enumerate().take(n).skip(period) {
        let ema = values[i] * k + prev * (1.0 - k);
        *value = ema;
        prev = ema;
    }
    result
}
