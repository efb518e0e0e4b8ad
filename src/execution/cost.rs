//! Commission and slippage cost model (spec §4.4).

/// Fee parameters shared by every order in a run: flat commission per fill
/// plus a percentage of notional, and a percentage slippage applied against
/// the trader on every fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeModel {
    pub commission_flat: f64,
    pub commission_pct: f64,
    pub slippage_pct: f64,
}

impl FeeModel {
    pub fn zero() -> Self {
        FeeModel {
            commission_flat: 0.0,
            commission_pct: 0.0,
            slippage_pct: 0.0,
        }
    }

    /// `flat + notional * pct/100`.
    pub fn commission(&self, notional: f64) -> f64 {
        self.commission_flat + notional * self.commission_pct / 100.0
    }

    /// Adversarial price adjustment: `adverse=true` pushes `price` against
    /// the trader (buy-to-open, buy-to-cover), `false` pulls it in the
    /// trader's favor's opposite direction (sell-to-close, sell-short).
    pub fn slip(&self, price: f64, adverse: bool) -> f64 {
        if adverse {
            price * (1.0 + self.slippage_pct / 100.0)
        } else {
            price * (1.0 - self.slippage_pct / 100.0)
        }
    }
}

/// `floor(capital/price)`, or 0 if either is non-positive (spec §4.4).
pub fn share_quantity(capital: f64, price: f64) -> i64 {
    if capital <= 0.0 || price <= 0.0 {
        return 0;
    }
    (capital / price).floor() as i64
}
