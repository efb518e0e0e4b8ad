//! Moving Average Convergence/Divergence.
//!
//! `line = EMA(fast) - EMA(slow)` over close, valid once both EMAs are
//! seeded. `signal` is an EMA of period `sig` over the *compacted* sequence
//! of valid MACD-line values (not over bar index), seeded with the simple
//! mean of the first `sig` valid line values. The line itself is reported
//! `valid = false` until the signal is seeded — once seeded, line/signal/
//! histogram are all valid together (spec §4.1).

use super::ema::ema_of_series;
use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar], fast: usize, slow: usize, signal_period: usize) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("MACD: empty bar vector".into()));
    }
    if fast < 1 || slow < 1 || signal_period < 1 {
        return Err(EngineError::RuleInvalid(
            "MACD: fast/slow/signal periods must be >= 1".into(),
        ));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_of_series(&closes, fast);
    let ema_slow = ema_of_series(&closes, slow);

    let n = bars.len();
    let line: Vec<f64> = (0..n)
        .map(|i| {
            if ema_fast[i].is_finite() && ema_slow[i].is_finite() {
                ema_fast[i] - ema_slow[i]
            } else {
                f64::NAN
            }
        })
        .collect();

    // Compact the valid line values, in bar-index order.
    let valid_line: Vec<(usize, f64)> = line
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, v)| (i, *v))
        .collect();

    let mut series = IndicatorSeries::invalid_of_kind(
        IndicatorKind::Macd,
        bars,
        (fast, slow as i64, signal_period as i64),
    );

    if valid_line.len() < signal_period {
        return Ok(series);
    }

    let alpha = 2.0 / (signal_period as f64 + 1.0);
    let seed: f64 =
        valid_line[..signal_period].iter().map(|(_, v)| v).sum::<f64>() / signal_period as f64;

    let (seed_bar_idx, seed_line) = valid_line[signal_period - 1];
    series.values[seed_bar_idx] = IndicatorPoint {
        date: bars[seed_bar_idx].date,
        valid: true,
        value: IndicatorValue::Macd {
            line: seed_line,
            signal: seed,
            histogram: seed_line - seed,
        },
    };

    let mut prev_signal = seed;
    for &(bar_idx, line_value) in &valid_line[signal_period..] {
        let sig = alpha * line_value + (1.0 - alpha) * prev_signal;
        series.values[bar_idx] = IndicatorPoint {
            date: bars[bar_idx].date,
            valid: true,
            value: IndicatorValue::Macd {
                line: line_value,
                signal: sig,
                histogram: line_value - sig,
            },
        };
        prev_signal = sig;
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::make_bars;

    #[test]
    fn macd_invalid_until_signal_seeded() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.5).collect();
        let bars = make_bars(&closes);
        let series = compute(&bars, 12, 26, 9).unwrap();
        // fast/slow seed at index 25; signal needs 9 more valid line values,
        // so the first valid MACD triple is well after index 25.
        let first_valid = series.values.iter().position(|p| p.valid).unwrap();
        assert!(first_valid > 25);
        for p in &series.values[..first_valid] {
            assert!(!p.valid);
        }
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.2).sin() * 5.0).collect();
        let bars = make_bars(&closes);
        let series = compute(&bars, 5, 10, 3).unwrap();
        for p in series.values.iter().filter(|p| p.valid) {
            if let IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } = p.value
            {
                assert!((histogram - (line - signal)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn macd_rejects_empty() {
        assert!(compute(&[], 12, 26, 9).is_err());
    }
}
