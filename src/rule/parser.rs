//! Recursive-descent parser for the rule grammar (spec §4.2).
//!
//! LL(1) once function names are treated as keywords followed by `(`; a
//! parser generator would be overkill for a grammar this shape. Maximal-munch
//! identifier scanning gives longest-match for free — `PIVOT_R1` is read as
//! one token before it is ever compared against `PIVOT`.

use super::ast::{CompareOp, CompositeOp, Rule, TemporalOp, MAX_COMPOSITE_CHILDREN};
use super::operand::{Field, Operand};
use crate::error::EngineError;
use crate::indicators::IndicatorKind;

type PResult<T> = std::result::Result<T, EngineError>;

/// Parse a complete rule. Trailing non-whitespace after the root rule is a
/// parse error (spec §4.2).
pub fn parse(input: &str) -> PResult<Rule> {
    let mut p = Parser {
        src: input.as_bytes(),
        pos: 0,
    };
    let rule = p.parse_rule()?;
    p.skip_ws();
    if p.pos != p.src.len() {
        return Err(EngineError::RuleParse(format!(
            "trailing input at byte {}",
            p.pos
        )));
    }
    Ok(rule)
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

impl<'a> Parser<'a> {
    fn skip_ws(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn expect_byte(&mut self, b: u8) -> PResult<()> {
        self.skip_ws();
        if self.peek() == Some(b) {
            self.pos += 1;
            Ok(())
        } else {
            Err(EngineError::RuleParse(format!(
                "expected '{}' at byte {}",
                b as char, self.pos
            )))
        }
    }

    /// Maximal-munch identifier scan: `[A-Za-z0-9_]+`.
    fn read_ident(&mut self) -> PResult<&'a str> {
        self.skip_ws();
        let start = self.pos;
        while self.pos < self.src.len() && is_ident_char(self.src[self.pos]) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(EngineError::RuleParse(format!(
                "expected identifier at byte {start}"
            )));
        }
        std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| EngineError::RuleParse("invalid utf-8 in identifier".into()))
    }

    fn read_number(&mut self) -> PResult<f64> {
        self.skip_ws();
        let start = self.pos;
        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        let mut seen_digit = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                seen_digit = true;
                self.pos += 1;
            } else if c == b'.' || c == b'e' || c == b'E' || c == b'+' || c == b'-' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if !seen_digit {
            return Err(EngineError::RuleParse(format!(
                "expected number at byte {start}"
            )));
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap();
        text.parse::<f64>()
            .map_err(|_| EngineError::RuleParse(format!("malformed number '{text}'")))
    }

    fn read_int(&mut self) -> PResult<i64> {
        let v = self.read_number()?;
        if v.fract() != 0.0 {
            return Err(EngineError::RuleParse(format!("expected integer, got {v}")));
        }
        Ok(v as i64)
    }

    fn read_period(&mut self) -> PResult<usize> {
        let n = self.read_int()?;
        if n < 1 {
            return Err(EngineError::RuleParse(format!(
                "indicator period must be >= 1, got {n}"
            )));
        }
        Ok(n as usize)
    }

    fn parse_rule(&mut self) -> PResult<Rule> {
        self.skip_ws();
        let start = self.pos;
        let ident = self.read_ident()?;
        match ident {
            "CROSS_ABOVE" => self.parse_comparison(CompareOp::CrossAbove),
            "CROSS_BELOW" => self.parse_comparison(CompareOp::CrossBelow),
            "ABOVE" => self.parse_comparison(CompareOp::Above),
            "BELOW" => self.parse_comparison(CompareOp::Below),
            "EQUALS" => self.parse_comparison(CompareOp::Equals),
            "BETWEEN" => self.parse_between(),
            "AND" => self.parse_composite(CompositeOp::And),
            "OR" => self.parse_composite(CompositeOp::Or),
            "NOT" => self.parse_not(),
            "CONSECUTIVE" => self.parse_temporal(TemporalOp::Consecutive),
            "ANY_OF" => self.parse_temporal(TemporalOp::AnyOf),
            other => Err(EngineError::RuleParse(format!(
                "unknown rule keyword '{other}' at byte {start}"
            ))),
        }
    }

    fn parse_comparison(&mut self, op: CompareOp) -> PResult<Rule> {
        self.expect_byte(b'(')?;
        let left = self.parse_operand()?;
        self.expect_byte(b',')?;
        let right = self.parse_operand()?;
        self.expect_byte(b')')?;
        Ok(Rule::Comparison { op, left, right })
    }

    fn parse_between(&mut self) -> PResult<Rule> {
        self.expect_byte(b'(')?;
        let value = self.parse_operand()?;
        self.expect_byte(b',')?;
        let lower = self.read_number()?;
        self.expect_byte(b',')?;
        let upper = self.read_number()?;
        self.expect_byte(b')')?;
        Ok(Rule::Between { value, lower, upper })
    }

    fn parse_composite(&mut self, op: CompositeOp) -> PResult<Rule> {
        self.expect_byte(b'(')?;
        let mut children = vec![self.parse_rule()?];
        self.skip_ws();
        while self.peek() == Some(b',') {
            self.pos += 1;
            children.push(self.parse_rule()?);
            self.skip_ws();
        }
        self.expect_byte(b')')?;
        if children.len() > MAX_COMPOSITE_CHILDREN {
            return Err(EngineError::RuleParse(format!(
                "composite has {} children, max is {MAX_COMPOSITE_CHILDREN}",
                children.len()
            )));
        }
        Ok(Rule::Composite { op, children })
    }

    fn parse_not(&mut self) -> PResult<Rule> {
        self.expect_byte(b'(')?;
        let child = self.parse_rule()?;
        self.expect_byte(b')')?;
        Ok(Rule::Not {
            child: Box::new(child),
        })
    }

    fn parse_temporal(&mut self, op: TemporalOp) -> PResult<Rule> {
        self.expect_byte(b'(')?;
        let child = self.parse_rule()?;
        self.expect_byte(b',')?;
        let lookback = self.read_int()?;
        self.expect_byte(b')')?;
        if lookback < 1 {
            return Err(EngineError::RuleParse(format!(
                "temporal lookback must be >= 1, got {lookback}"
            )));
        }
        Ok(Rule::Temporal {
            op,
            child: Box::new(child),
            lookback,
        })
    }

    fn parse_operand(&mut self) -> PResult<Operand> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c.is_ascii_digit() || c == b'-' || c == b'+' || c == b'.' => {
                Ok(Operand::Constant(self.read_number()?))
            }
            _ => {
                let start = self.pos;
                let ident = self.read_ident()?;
                match ident {
                    "close" => Ok(Operand::PriceClose),
                    "open" => Ok(Operand::PriceOpen),
                    "high" => Ok(Operand::PriceHigh),
                    "low" => Ok(Operand::PriceLow),
                    "volume" => Ok(Operand::Volume),
                    "SMA" => self.parse_simple_indicator(IndicatorKind::Sma),
                    "EMA" => self.parse_simple_indicator(IndicatorKind::Ema),
                    "RSI" => self.parse_simple_indicator(IndicatorKind::Rsi),
                    "ATR" => self.parse_simple_indicator(IndicatorKind::Atr),
                    "MACD" => self.parse_macd(),
                    "BOLLINGER_UPPER" => self.parse_bollinger(Field::BollingerUpper),
                    "BOLLINGER_MIDDLE" => self.parse_bollinger(Field::BollingerMiddle),
                    "BOLLINGER_LOWER" => self.parse_bollinger(Field::BollingerLower),
                    "PIVOT_R1" => Ok(pivot_operand(Field::PivotR1)),
                    "PIVOT_R2" => Ok(pivot_operand(Field::PivotR2)),
                    "PIVOT_R3" => Ok(pivot_operand(Field::PivotR3)),
                    "PIVOT_S1" => Ok(pivot_operand(Field::PivotS1)),
                    "PIVOT_S2" => Ok(pivot_operand(Field::PivotS2)),
                    "PIVOT_S3" => Ok(pivot_operand(Field::PivotS3)),
                    "PIVOT" => Ok(pivot_operand(Field::PivotP)),
                    other => Err(EngineError::RuleParse(format!(
                        "unknown operand '{other}' at byte {start}"
                    ))),
                }
            }
        }
    }

    fn parse_simple_indicator(&mut self, kind: IndicatorKind) -> PResult<Operand> {
        self.expect_byte(b'(')?;
        let period = self.read_period()?;
        self.expect_byte(b')')?;
        Ok(Operand::Indicator {
            kind,
            period,
            param2: 0,
            param3: 0,
            field: Field::Line,
        })
    }

    fn parse_macd(&mut self) -> PResult<Operand> {
        self.expect_byte(b'(')?;
        let fast = self.read_period()?;
        self.expect_byte(b',')?;
        let slow = self.read_period()?;
        self.expect_byte(b',')?;
        let signal = self.read_period()?;
        self.expect_byte(b')')?;
        Ok(Operand::Indicator {
            kind: IndicatorKind::Macd,
            period: fast,
            param2: slow as i64,
            param3: signal as i64,
            field: Field::Line,
        })
    }

    fn parse_bollinger(&mut self, field: Field) -> PResult<Operand> {
        self.expect_byte(b'(')?;
        let period = self.read_period()?;
        self.expect_byte(b',')?;
        let multiplier = self.read_number()?;
        self.expect_byte(b')')?;
        Ok(Operand::Indicator {
            kind: IndicatorKind::Bollinger,
            period,
            param2: (multiplier * 100.0).round() as i64,
            param3: field.bollinger_param3(),
            field,
        })
    }
}

fn pivot_operand(field: Field) -> Operand {
    Operand::Indicator {
        kind: IndicatorKind::Pivot,
        period: 0,
        param2: field.pivot_param2(),
        param3: 0,
        field,
    }
}
