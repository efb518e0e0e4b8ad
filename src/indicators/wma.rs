//! Weighted Moving Average.
//!
//! Weights 1..period over the window, newest bar weighted `period`, divisor
//! `period*(period+1)/2`. Invalid for `i < period-1`.

use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar], period: usize) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("WMA: empty bar vector".into()));
    }
    if period < 1 {
        return Err(EngineError::RuleInvalid("WMA: period must be >= 1".into()));
    }

    let n = bars.len();
    let mut series = IndicatorSeries::invalid_of_kind(IndicatorKind::Wma, bars, (period, 0, 0));
    if n < period {
        return Ok(series);
    }

    let divisor = (period * (period + 1) / 2) as f64;
    for i in (period - 1)..n {
        let window = &bars[(i + 1 - period)..=i];
        let weighted: f64 = window
            .iter()
            .enumerate()
            .map(|(j, b)| b.close * (j + 1) as f64)
            .sum();
        series.values[i] = IndicatorPoint {
            date: bars[i].date,
            valid: true,
            value: IndicatorValue::Simple {
                value: weighted / divisor,
            },
        };
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{assert_point_approx, make_bars};

    #[test]
    fn wma_3_known_values() {
        // closes 10, 20, 30. weights 1,2,3 divisor 6 -> (10*1+20*2+30*3)/6 = 140/6
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = compute(&bars, 3).unwrap();
        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert_point_approx(&series.values[2], 140.0 / 6.0, 1e-10);
    }

    #[test]
    fn wma_period_1_equals_close() {
        let bars = make_bars(&[5.0, 6.0]);
        let series = compute(&bars, 1).unwrap();
        assert_point_approx(&series.values[0], 5.0, 1e-10);
        assert_point_approx(&series.values[1], 6.0, 1e-10);
    }
}
