//! Rule tree node types (spec §3 "Rule node").

use super::operand::Operand;
use serde::{Deserialize, Serialize};

/// Maximum children of a `Composite` node (spec §4.2 grammar: `{0,63}` extra
/// siblings after the first, i.e. `N <= 64` total).
pub const MAX_COMPOSITE_CHILDREN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    CrossAbove,
    CrossBelow,
    Above,
    Below,
    Equals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositeOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemporalOp {
    Consecutive,
    AnyOf,
}

/// A node in a rule tree. Pure data — evaluation lives in [`super::evaluator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rule {
    Comparison {
        op: CompareOp,
        left: Operand,
        right: Operand,
    },
    Between {
        value: Operand,
        lower: f64,
        upper: f64,
    },
    Composite {
        op: CompositeOp,
        children: Vec<Rule>,
    },
    Not {
        child: Box<Rule>,
    },
    Temporal {
        op: TemporalOp,
        child: Box<Rule>,
        lookback: i64,
    },
}

impl Rule {
    /// Reconstruct the canonical textual form the parser accepts (spec §8
    /// round-trip property).
    pub fn render(&self) -> String {
        match self {
            Rule::Comparison { op, left, right } => {
                let name = match op {
                    CompareOp::CrossAbove => "CROSS_ABOVE",
                    CompareOp::CrossBelow => "CROSS_BELOW",
                    CompareOp::Above => "ABOVE",
                    CompareOp::Below => "BELOW",
                    CompareOp::Equals => "EQUALS",
                };
                format!("{name}({},{})", left.render(), right.render())
            }
            Rule::Between { value, lower, upper } => {
                format!("BETWEEN({},{lower},{upper})", value.render())
            }
            Rule::Composite { op, children } => {
                let name = match op {
                    CompositeOp::And => "AND",
                    CompositeOp::Or => "OR",
                };
                let rendered = children
                    .iter()
                    .map(Rule::render)
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{name}({rendered})")
            }
            Rule::Not { child } => format!("NOT({})", child.render()),
            Rule::Temporal { op, child, lookback } => {
                let name = match op {
                    TemporalOp::Consecutive => "CONSECUTIVE",
                    TemporalOp::AnyOf => "ANY_OF",
                };
                format!("{name}({},{lookback})", child.render())
            }
        }
    }
}
