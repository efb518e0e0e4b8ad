//! Classic floor-trader pivot points, computed from the *previous* bar's HLC.
//!
//! Bar 0 has no previous bar and is invalid. `pivot = (H+L+C)/3`; resistances
//! and supports fan out from there (spec §4.1).

use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar]) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("Pivot: empty bar vector".into()));
    }

    let n = bars.len();
    let mut series = IndicatorSeries::invalid_of_kind(IndicatorKind::Pivot, bars, (0, 0, 0));

    for i in 1..n {
        let prev = &bars[i - 1];
        let pivot = (prev.high + prev.low + prev.close) / 3.0;
        let range = prev.high - prev.low;
        series.values[i] = IndicatorPoint {
            date: bars[i].date,
            valid: true,
            value: IndicatorValue::Pivot {
                pivot,
                r1: 2.0 * pivot - prev.low,
                r2: pivot + range,
                r3: prev.high + 2.0 * (pivot - prev.low),
                s1: 2.0 * pivot - prev.high,
                s2: pivot - range,
                s3: prev.low - 2.0 * (prev.high - pivot),
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
    fn bar_zero_is_invalid() {
        let bars = make_bars(&[10.0, 11.0]);
        let series = compute(&bars).unwrap();
        assert!(!series.values[0].valid);
        assert!(series.values[1].valid);
    }

    #[test]
    fn pivot_known_values() {
        // Previous bar H=110, L=90, C=100 -> pivot = 100
        let mut bars = make_bars(&[100.0, 105.0]);
        bars[0].high = 110.0;
        bars[0].low = 90.0;
        bars[0].close = 100.0;
        let series = compute(&bars).unwrap();
        if let IndicatorValue::Pivot {
            pivot,
            r1,
            r2,
            r3,
            s1,
            s2,
            s3,
        } = series.values[1].value
        {
            assert!((pivot - 100.0).abs() < 1e-9);
            assert!((r1 - 110.0).abs() < 1e-9); // 2*100-90
            assert!((r2 - 120.0).abs() < 1e-9); // 100+20
            assert!((r3 - 130.0).abs() < 1e-9); // 110+2*(100-90)
            assert!((s1 - 90.0).abs() < 1e-9); // 2*100-110
            assert!((s2 - 80.0).abs() < 1e-9); // 100-20
            assert!((s3 - 70.0).abs() < 1e-9); // 90-2*(110-100)
        } else {
            panic!("expected pivot");
        }
    }
}
