//! Rule leaves: price fields, constants, and indicator references.

use crate::indicators::IndicatorKind;
use serde::{Deserialize, Serialize};

/// Which field of a multi-valued indicator an operand resolves to.
///
/// Encoded into `param3` for Bollinger, `param2` for Pivot, per spec §4.2's
/// representation convention. Simple-valued indicators (SMA/EMA/WMA/RSI/ROC/
/// ATR/STDDEV/OBV/VWAP) and MACD's generic reference always use `Line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Line,
    MacdSignal,
    MacdHistogram,
    BollingerUpper,
    BollingerMiddle,
    BollingerLower,
    StochasticK,
    StochasticD,
    PivotP,
    PivotR1,
    PivotR2,
    PivotR3,
    PivotS1,
    PivotS2,
    PivotS3,
}

/// A rule-leaf value (spec §3 "Operand").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    PriceOpen,
    PriceHigh,
    PriceLow,
    PriceClose,
    Volume,
    Constant(f64),
    Indicator {
        kind: IndicatorKind,
        period: usize,
        param2: i64,
        param3: i64,
        field: Field,
    },
}

impl Field {
    /// Bollinger band selector encoded into `param3` (spec §4.2).
    pub(crate) fn bollinger_param3(&self) -> i64 {
        match self {
            Field::BollingerUpper => 0,
            Field::BollingerMiddle => 1,
            Field::BollingerLower => 2,
            other => panic!("{other:?} is not a Bollinger field"),
        }
    }

    pub(crate) fn from_bollinger_param3(code: i64) -> Option<Field> {
        match code {
            0 => Some(Field::BollingerUpper),
            1 => Some(Field::BollingerMiddle),
            2 => Some(Field::BollingerLower),
            _ => None,
        }
    }

    /// Pivot field selector encoded into `param2` (spec §4.2).
    pub(crate) fn pivot_param2(&self) -> i64 {
        match self {
            Field::PivotP => 0,
            Field::PivotR1 => 1,
            Field::PivotR2 => 2,
            Field::PivotR3 => 3,
            Field::PivotS1 => 4,
            Field::PivotS2 => 5,
            Field::PivotS3 => 6,
            other => panic!("{other:?} is not a Pivot field"),
        }
    }

    pub(crate) fn from_pivot_param2(code: i64) -> Option<Field> {
        match code {
            0 => Some(Field::PivotP),
            1 => Some(Field::PivotR1),
            2 => Some(Field::PivotR2),
            3 => Some(Field::PivotR3),
            4 => Some(Field::PivotS1),
            5 => Some(Field::PivotS2),
            6 => Some(Field::PivotS3),
            _ => None,
        }
    }
}

impl Operand {
    /// Reconstruct the canonical textual form the parser accepts (spec §8
    /// round-trip property: parse, render, re-parse, identical evaluation).
    pub fn render(&self) -> String {
        match self {
            Operand::PriceOpen => "open".to_string(),
            Operand::PriceHigh => "high".to_string(),
            Operand::PriceLow => "low".to_string(),
            Operand::PriceClose => "close".to_string(),
            Operand::Volume => "volume".to_string(),
            Operand::Constant(v) => format!("{v}"),
            Operand::Indicator {
                kind,
                period,
                param2,
                param3,
                field,
            } => match kind {
                IndicatorKind::Sma => format!("SMA({period})"),
                IndicatorKind::Ema => format!("EMA({period})"),
                IndicatorKind::Rsi => format!("RSI({period})"),
                IndicatorKind::Atr => format!("ATR({period})"),
                IndicatorKind::Macd => format!("MACD({period},{param2},{param3})"),
                IndicatorKind::Bollinger => {
                    let name = match field {
                        Field::BollingerUpper => "BOLLINGER_UPPER",
                        Field::BollingerMiddle => "BOLLINGER_MIDDLE",
                        Field::BollingerLower => "BOLLINGER_LOWER",
                        _ => unreachable!("Bollinger operand without a Bollinger field"),
                    };
                    let multiplier = *param2 as f64 / 100.0;
                    format!("{name}({period},{multiplier})")
                }
                IndicatorKind::Pivot => match field {
                    Field::PivotP => "PIVOT".to_string(),
                    Field::PivotR1 => "PIVOT_R1".to_string(),
                    Field::PivotR2 => "PIVOT_R2".to_string(),
                    Field::PivotR3 => "PIVOT_R3".to_string(),
                    Field::PivotS1 => "PIVOT_S1".to_string(),
                    Field::PivotS2 => "PIVOT_S2".to_string(),
                    Field::PivotS3 => "PIVOT_S3".to_string(),
                    _ => unreachable!("Pivot operand without a Pivot field"),
                },
                other => unreachable!("{other:?} is not reachable from the rule grammar"),
            },
        }
    }

    /// Deterministic de-duplication key over `(kind, period, param2, param3)`
    /// (spec §4.2 "Operand fingerprint key"). `param2`/`param3` carry the
    /// Bollinger multiplier/band and Pivot field selector, so two operands
    /// reading different bands of the *same* Bollinger series still get
    /// distinct fingerprints — a direct consequence of the spec's encoding,
    /// not a cache defeat worth working around.
    pub fn fingerprint(&self) -> String {
        match self {
            Operand::Indicator {
                kind,
                period,
                param2,
                param3,
                ..
            } => {
                let key = format!("{kind:?}:{period}:{param2}:{param3}");
                blake3::hash(key.as_bytes()).to_hex().to_string()
            }
            Operand::PriceOpen => "price:open".to_string(),
            Operand::PriceHigh => "price:high".to_string(),
            Operand::PriceLow => "price:low".to_string(),
            Operand::PriceClose => "price:close".to_string(),
            Operand::Volume => "price:volume".to_string(),
            Operand::Constant(v) => format!("const:{v}"),
        }
    }
}
