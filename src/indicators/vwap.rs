//! Volume-Weighted Average Price — cumulative from the start of the series.
//!
//! `vwap[i] = sum(typical_price[0..=i] * volume[0..=i]) / sum(volume[0..=i])`.
//! Valid from index 0, unless cumulative volume is zero.

use super::value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::Bar;
use crate::error::{EngineError, Result};

pub fn compute(bars: &[Bar]) -> Result<IndicatorSeries> {
    if bars.is_empty() {
        return Err(EngineError::NoData("VWAP: empty bar vector".into()));
    }

    let n = bars.len();
    let mut series = IndicatorSeries::invalid_of_kind(IndicatorKind::Vwap, bars, (0, 0, 0));

    let mut cum_pv = 0.0;
    let mut cum_vol = 0.0;
    for (i, bar) in bars.iter().enumerate() {
        cum_pv += bar.typical_price() * bar.volume as f64;
        cum_vol += bar.volume as f64;
        if cum_vol > 0.0 {
            series.values[i] = IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Simple {
                    value: cum_pv / cum_vol,
                },
            };
        }
    }

    Ok(series)
}
