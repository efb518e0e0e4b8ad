//! Average True Range — Wilder smoothing of true range.
//!
//! Seed at `i = period-1` with the mean of the first `period` true ranges.
//! Thereafter Wilder: `atr = (prev*(period-1) + TR)/period`. Invalid for
//! `i < period-1`.

use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar], period: usize) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("ATR: empty bar vector".into()));
    }
    if period < 1 {
        return Err(EngineError::RuleInvalid("ATR: period must be >= 1".into()));
    }

    let n = bars.len();
    let trs: Vec<f64> = (0..n)
        .map(|i| {
            let prev_close = if i == 0 { None } else { Some(bars[i - 1].close) };
            bars[i].true_range(prev_close)
        })
        .collect();

    let mut series = IndicatorSeries::invalid_of_kind(IndicatorKind::Atr, bars, (period, 0, 0));
    if n < period {
        return Ok(series);
    }

    let mut atr = trs[..period].iter().sum::<f64>() / period as f64;
    series.values[period - 1] = IndicatorPoint {
        date: bars[period - 1].date,
        valid: true,
        value: IndicatorValue::Simple { value: atr },
    };

    for i in period..n {
        atr = (atr * (period - 1) as f64 + trs[i]) / period as f64;
        series.values[i] = IndicatorPoint {
            date: bars[i].date,
            valid: true,
            value: IndicatorValue::Simple { value: atr },
        };
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{assert_point_approx, make_bars};

    #[test]
    fn atr_seed_is_mean_of_first_period_trs() {
        let bars = make_bars(&[10.0, 11.0, 10.5, 11.5]);
        let series = compute(&bars, 2).unwrap();
        assert!(!series.values[0].valid);
        assert!(series.values[1].valid);
    }

    #[test]
    fn atr_constant_range_bars_is_constant() {
        // make_bars produces open=prev close, high=max+1, low=min-1, so each
        // bar's intrinsic range is 2.0 — but gaps between closes widen TR.
        // Use flat closes to get a purely-constant range series.
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0, 100.0]);
        let series = compute(&bars, 3).unwrap();
        if let IndicatorValue::Simple { value } = series.values[2].value {
            assert_point_approx(&series.values[3], value, 1e-9);
        }
    }
}
