//! Stochastic Oscillator.
//!
//! `%K = 100*(close - min_low)/(max_high - min_low)` over a `k_period`-bar
//! window (using bar highs/lows, bar close); `%K = 50` when the window's
//! range is zero. `%D = SMA(d_period)` of `%K`.

use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar], k_period: usize, d_period: usize) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("Stochastic: empty bar vector".into()));
    }
    if k_period < 1 || d_period < 1 {
        return Err(EngineError::RuleInvalid(
            "Stochastic: k_period/d_period must be >= 1".into(),
        ));
    }

    let n = bars.len();
    let mut percent_k = vec![f64::NAN; n];
    for i in k_period.saturating_sub(1)..n {
        if n < k_period {
            break;
        }
        let window = &bars[(i + 1 - k_period)..=i];
        let max_high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let min_low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let range = max_high - min_low;
        percent_k[i] = if range == 0.0 {
            50.0
        } else {
            100.0 * (bars[i].close - min_low) / range
        };
    }

    let mut series = IndicatorSeries::invalid_of_kind(
        IndicatorKind::Stochastic,
        bars,
        (k_period, d_period as i64, 0),
    );

    if n < k_period {
        return Ok(series);
    }

    let first_k = k_period - 1;
    for i in first_k..n {
        if i + 1 - first_k < d_period {
            // %D not yet available: still valid at %K alone is NOT reported —
            // spec requires both k and d for a valid Stochastic point once
            // d_period %K values exist. Until then we still record %K with
            // d=NaN but keep the point invalid to honor "valid once d_period
            // %K values exist".
            series.values[i] = IndicatorPoint {
                date: bars[i].date,
                valid: false,
                value: IndicatorValue::Stochastic {
                    k: percent_k[i],
                    d: f64::NAN,
                },
            };
            continue;
        }
        let window = &percent_k[(i + 1 - d_period)..=i];
        let d = window.iter().sum::<f64>() / d_period as f64;
        series.values[i] = IndicatorPoint {
            date: bars[i].date,
            valid: true,
            value: IndicatorValue::Stochastic { k: percent_k[i], d },
        };
    }

    Ok(series)
}
