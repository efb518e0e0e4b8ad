//! Rate of Change — percent change of close versus `period` bars ago.
//!
//! `ROC[i] = (close[i] - close[i-period]) / close[i-period] * 100`.
//! Invalid for `i < period`.

use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar], period: usize) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("ROC: empty bar vector".into()));
    }
    if period < 1 {
        return Err(EngineError::RuleInvalid("ROC: period must be >= 1".into()));
    }

    let n = bars.len();
    let mut series = IndicatorSeries::invalid_of_kind(IndicatorKind::Roc, bars, (period, 0, 0));
    if n <= period {
        return Ok(series);
    }

    for i in period..n {
        let base = bars[i - period].close;
        if base == 0.0 {
            continue;
        }
        series.values[i] = IndicatorPoint {
            date: bars[i].date,
            valid: true,
            value: IndicatorValue::Simple {
                value: (bars[i].close - base) / base * 100.0,
            },
        };
    }
    Ok(series)
}
