//! On-Balance Volume — cumulative volume flow signed by close direction.
//!
//! `obv[0] = volume[0]`; for `i >= 1`, add volume when close rises, subtract
//! when it falls, carry forward unchanged when flat. Valid from index 0 —
//! there is no warmup window.

use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar]) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("OBV: empty bar vector".into()));
    }

    let n = bars.len();
    let mut series = IndicatorSeries::invalid_of_kind(IndicatorKind::Obv, bars, (0, 0, 0));

    let mut obv = bars[0].volume as f64;
    series.values[0] = IndicatorPoint {
        date: bars[0].date,
        valid: true,
        value: IndicatorValue::Simple { value: obv },
    };

    for i in 1..n {
        obv += match bars[i].close.partial_cmp(&bars[i - 1].close) {
            Some(std::cmp::Ordering::Greater) => bars[i].volume as f64,
            Some(std::cmp::Ordering::Less) => -(bars[i].volume as f64),
            _ => 0.0,
        };
        series.values[i] = IndicatorPoint {
            date: bars[i].date,
            valid: true,
            value: IndicatorValue::Simple { value: obv },
        };
    }

    Ok(series)
}
