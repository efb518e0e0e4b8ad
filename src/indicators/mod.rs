//! Streaming indicator engine — 13 indicator kinds, precomputed once per code
//! before the bar loop (spec §2 component B, §3).

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod pivot;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod stochastic;
pub mod value;
pub mod vwap;
pub mod wma;

pub use value::{IndicatorKind, IndicatorPoint, IndicatorSeries, IndicatorValue};
