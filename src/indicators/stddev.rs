//! Rolling population standard deviation of close over `period` bars.
//!
//! Invalid for `i < period-1`. Shares the window-variance formula Bollinger
//! uses internally, exposed here as its own standalone series.

use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar], period: usize) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("STDDEV: empty bar vector".into()));
    }
    if period < 1 {
        return Err(EngineError::RuleInvalid(
            "STDDEV: period must be >= 1".into(),
        ));
    }

    let n = bars.len();
    let mut series = IndicatorSeries::invalid_of_kind(IndicatorKind::Stddev, bars, (period, 0, 0));
    if n < period {
        return Ok(series);
    }

    for i in (period - 1)..n {
        let window = &bars[(i + 1 - period)..=i];
        let mean = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
        let variance = window.iter().map(|b| (b.close - mean).powi(2)).sum::<f64>() / period as f64;
        series.values[i] = IndicatorPoint {
            date: bars[i].date,
            valid: true,
            value: IndicatorValue::Simple {
                value: variance.sqrt(),
            },
        };
    }
    Ok(series)
}
