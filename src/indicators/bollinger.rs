//! Bollinger Bands.
//!
//! Middle = SMA(period). Population stddev over the same window.
//! Upper/Lower = middle ± multiplier*stddev. Invalid for `i < period-1`.

use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar], period: usize, multiplier: f64) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("Bollinger: empty bar vector".into()));
    }
    if period < 1 {
        return Err(EngineError::RuleInvalid(
            "Bollinger: period must be >= 1".into(),
        ));
    }

    let n = bars.len();
    // param2 carries round(multiplier*100) per spec's representation convention (§4.2).
    let mut series = IndicatorSeries::invalid_of_kind(
        IndicatorKind::Bollinger,
        bars,
        (period, (multiplier * 100.0).round() as i64, 0),
    );
    if n < period {
        return Ok(series);
    }

    for i in (period - 1)..n {
        let window = &bars[(i + 1 - period)..=i];
        let middle = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|b| (b.close - middle).powi(2))
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        series.values[i] = IndicatorPoint {
            date: bars[i].date,
            valid: true,
            value: IndicatorValue::Bollinger {
                upper: middle + multiplier * stddev,
                middle,
                lower: middle - multiplier * stddev,
            },
        };
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::make_bars;

    #[test]
    fn bollinger_middle_is_sma() {
        let bars = make_bars(&[10.0, 10.0, 10.0, 10.0]);
        let series = compute(&bars, 4, 2.0).unwrap();
        if let IndicatorValue::Bollinger {
            upper,
            middle,
            lower,
        } = series.values[3].value
        {
            assert!((middle - 10.0).abs() < 1e-9);
            // Zero variance -> bands collapse onto middle.
            assert!((upper - 10.0).abs() < 1e-9);
            assert!((lower - 10.0).abs() < 1e-9);
        } else {
            panic!("expected bollinger");
        }
    }

    #[test]
    fn bollinger_bands_widen_with_variance() {
        let bars = make_bars(&[8.0, 12.0, 8.0, 12.0]);
        let series = compute(&bars, 4, 2.0).unwrap();
        if let IndicatorValue::Bollinger { upper, lower, .. } = series.values[3].value {
            assert!(upper > 10.0);
            assert!(lower < 10.0);
        } else {
            panic!("expected bollinger");
        }
    }

    #[test]
    fn bollinger_invalid_before_warmup() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let series = compute(&bars, 3, 2.0).unwrap();
        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
    }
}
