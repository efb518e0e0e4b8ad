//! Indicator value tagged union and the series that carries it alongside bars.

use crate::domain::Bar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The 13 streaming indicator kinds the engine can compute (spec §2, component B).
///
/// Only a subset (SMA, EMA, RSI, ATR, MACD, Bollinger, Pivot) is reachable from
/// the rule grammar (spec §4.2) — the rest exist as engine-level building
/// blocks / standalone series (Stochastic, WMA, ROC, STDDEV, OBV, VWAP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Wma,
    Rsi,
    Roc,
    Atr,
    Stddev,
    Obv,
    Vwap,
    Macd,
    Stochastic,
    Bollinger,
    Pivot,
}

/// Tagged indicator value. Every bar index has one, valid or not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IndicatorValue {
    Simple {
        value: f64,
    },
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Stochastic {
        k: f64,
        d: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
    Pivot {
        pivot: f64,
        r1: f64,
        r2: f64,
        r3: f64,
        s1: f64,
        s2: f64,
        s3: f64,
    },
}

impl IndicatorValue {
    fn invalid_simple() -> Self {
        IndicatorValue::Simple { value: f64::NAN }
    }

    fn invalid_macd() -> Self {
        IndicatorValue::Macd {
            line: f64::NAN,
            signal: f64::NAN,
            histogram: f64::NAN,
        }
    }

    fn invalid_stochastic() -> Self {
        IndicatorValue::Stochastic {
            k: f64::NAN,
            d: f64::NAN,
        }
    }

    fn invalid_bollinger() -> Self {
        IndicatorValue::Bollinger {
            upper: f64::NAN,
            middle: f64::NAN,
            lower: f64::NAN,
        }
    }

    fn invalid_pivot() -> Self {
        IndicatorValue::Pivot {
            pivot: f64::NAN,
            r1: f64::NAN,
            r2: f64::NAN,
            r3: f64::NAN,
            s1: f64::NAN,
            s2: f64::NAN,
            s3: f64::NAN,
        }
    }
}

/// One dated, possibly-warmup entry in an [`IndicatorSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

/// A precomputed streaming indicator series aligned 1:1 with a bar vector.
///
/// Invariant: `values.len() == bars.len()` and `values[i].date == bars[i].date`
/// for every `i` (spec §3). Indices before the first valid index carry
/// `valid == false`; once true it remains true thereafter (no indicator here
/// un-validates).
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub kind: IndicatorKind,
    pub params: (usize, i64, i64),
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Build a series of the given kind from dates + a closure producing
    /// `(valid, value)` per index. `params` carries the fingerprint-relevant
    /// configuration (period, param2, param3) as in spec §4.2.
    pub(crate) fn invalid_of_kind(kind: IndicatorKind, bars: &[Bar], params: (usize, i64, i64)) -> Self {
        let invalid_value = match kind {
            IndicatorKind::Macd => IndicatorValue::invalid_macd(),
            IndicatorKind::Stochastic => IndicatorValue::invalid_stochastic(),
            IndicatorKind::Bollinger => IndicatorValue::invalid_bollinger(),
            IndicatorKind::Pivot => IndicatorValue::invalid_pivot(),
            _ => IndicatorValue::invalid_simple(),
        };
        IndicatorSeries {
            kind,
            params,
            values: bars
                .iter()
                .map(|b| IndicatorPoint {
                    date: b.date,
                    valid: false,
                    value: invalid_value,
                })
                .collect(),
        }
    }
}
