//! Simple Moving Average.
//!
//! Window mean of close price over `period` bars. Invalid for `i < period-1`.

use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar], period: usize) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("SMA: empty bar vector".into()));
    }
    if period < 1 {
        return Err(EngineError::RuleInvalid("SMA: period must be >= 1".into()));
    }

    let n = bars.len();
    let mut series = IndicatorSeries::invalid_of_kind(IndicatorKind::Sma, bars, (period, 0, 0));

    if n < period {
        return Ok(series);
    }

    let mut sum: f64 = bars[..period].iter().map(|b| b.close).sum();
    series.values[period - 1] = IndicatorPoint {
        date: bars[period - 1].date,
        valid: true,
        value: IndicatorValue::Simple { value: sum / period as f64 },
    };

    for i in period..n {
        sum += bars[i].close - bars[i - period].close;
        series.values[i] = IndicatorPoint {
            date: bars[i].date,
            valid: true,
            value: IndicatorValue::Simple { value: sum / period as f64 },
        };
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{assert_point_approx, make_bars};

    #[test]
    fn sma_5_basic() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let series = compute(&bars, 5).unwrap();
        for i in 0..4 {
            assert!(!series.values[i].valid);
        }
        assert_point_approx(&series.values[4], 12.0, 1e-10);
        assert_point_approx(&series.values[5], 13.0, 1e-10);
        assert_point_approx(&series.values[6], 14.0, 1e-10);
    }

    #[test]
    fn sma_period_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let series = compute(&bars, 1).unwrap();
        assert_point_approx(&series.values[0], 100.0, 1e-10);
        assert_point_approx(&series.values[2], 300.0, 1e-10);
    }

    #[test]
    fn sma_too_few_bars_is_all_invalid() {
        let bars = make_bars(&[10.0, 11.0]);
        let series = compute(&bars, 5).unwrap();
        assert!(series.values.iter().all(|v| !v.valid));
    }

    #[test]
    fn sma_rejects_empty_bars() {
        assert!(compute(&[], 5).is_err());
    }

    #[test]
    fn sma_rejects_zero_period() {
        let bars = make_bars(&[10.0, 11.0]);
        assert!(compute(&bars, 0).is_err());
    }

    #[test]
    fn series_length_matches_bars_and_dates_align() {
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        let series = compute(&bars, 2).unwrap();
        assert_eq!(series.values.len(), bars.len());
        for (p, b) in series.values.iter().zip(bars.iter()) {
            assert_eq!(p.date, b.date);
        }
    }
}
