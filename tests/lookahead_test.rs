//! Every indicator must be computable online: truncating the bar history
//! must never change an already-computed value at an earlier index. This
//! guards the point-in-time evaluation guarantee the rule engine depends on
//! (spec §4.2 "No look-ahead").

use backtest_engine::domain::Bar;
use backtest_engine::indicators::value::{IndicatorSeries, IndicatorValue};
use backtest_engine::indicators::{atr, bollinger, ema, macd, obv, pivot, rsi, sma, stochastic, vwap, wma};
use chrono::{Duration, NaiveDate};

/// Deterministic pseudo-random walk (linear congruential generator), floored
/// at 10.0 so prices never go non-positive.
fn make_bars(n: usize) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut price = 100.0_f64;
    let mut seed: u64 = 7;
    (0..n)
        .map(|i| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            let drift = ((seed >> 33) as f64 / u32::MAX as f64 - 0.5) * 4.0;
            price = (price + drift).max(10.0);
            let high = price + 1.0;
            let low = (price - 1.0).max(1.0);
            Bar {
                code: "T".into(),
                exchange: "X".into(),
                date: base + Duration::days(i as i64),
                open: price,
                high,
                low,
                close: price,
                volume: 1000 + (i as u64 * 7) % 500,
            }
        })
        .collect()
}

fn nan_aware_eq(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

fn values_match(a: &IndicatorValue, b: &IndicatorValue) -> bool {
    match (a, b) {
        (IndicatorValue::Simple { value: x }, IndicatorValue::Simple { value: y }) => nan_aware_eq(*x, *y),
        (
            IndicatorValue::Macd {
                line: l1,
                signal: s1,
                histogram: h1,
            },
            IndicatorValue::Macd {
                line: l2,
                signal: s2,
                histogram: h2,
            },
        ) => nan_aware_eq(*l1, *l2) && nan_aware_eq(*s1, *s2) && nan_aware_eq(*h1, *h2),
        (IndicatorValue::Stochastic { k: k1, d: d1 }, IndicatorValue::Stochastic { k: k2, d: d2 }) => {
            nan_aware_eq(*k1, *k2) && nan_aware_eq(*d1, *d2)
        }
        (
            IndicatorValue::Bollinger {
                upper: u1,
                middle: m1,
                lower: l1,
            },
            IndicatorValue::Bollinger {
                upper: u2,
                middle: m2,
                lower: l2,
            },
        ) => nan_aware_eq(*u1, *u2) && nan_aware_eq(*m1, *m2) && nan_aware_eq(*l1, *l2),
        (
            IndicatorValue::Pivot {
                pivot: p1,
                r1: pr1,
                r2: pr2,
                r3: pr3,
                s1: ps1,
                s2: ps2,
                s3: ps3,
            },
            IndicatorValue::Pivot {
                pivot: p2,
                r1: qr1,
                r2: qr2,
                r3: qr3,
                s1: qs1,
                s2: qs2,
                s3: qs3,
            },
        ) => {
            nan_aware_eq(*p1, *p2)
                && nan_aware_eq(*pr1, *qr1)
                && nan_aware_eq(*pr2, *qr2)
                && nan_aware_eq(*pr3, *qr3)
                && nan_aware_eq(*ps1, *qs1)
                && nan_aware_eq(*ps2, *qs2)
                && nan_aware_eq(*ps3, *qs3)
        }
        _ => false,
    }
}

fn assert_no_lookahead(full: &IndicatorSeries, truncated: &IndicatorSeries, truncated_len: usize) {
    assert_eq!(truncated.values.len(), truncated_len);
    for i in 0..truncated_len {
        let f = &full.values[i];
        let t = &truncated.values[i];
        assert_eq!(f.valid, t.valid, "validity diverged at index {i}");
        assert!(values_match(&f.value, &t.value), "value diverged at index {i}: {:?} vs {:?}", f.value, t.value);
    }
}

#[test]
fn sma_has_no_lookahead_bias() {
    let bars = make_bars(60);
    let full = sma::compute(&bars, 10).unwrap();
    let truncated = sma::compute(&bars[..40], 10).unwrap();
    assert_no_lookahead(&full, &truncated, 40);
}

#[test]
fn ema_has_no_lookahead_bias() {
    let bars = make_bars(60);
    let full = ema::compute(&bars, 10).unwrap();
    let truncated = ema::compute(&bars[..40], 10).unwrap();
    assert_no_lookahead(&full, &truncated, 40);
}

#[test]
fn wma_has_no_lookahead_bias() {
    let bars = make_bars(60);
    let full = wma::compute(&bars, 10).unwrap();
    let truncated = wma::compute(&bars[..40], 10).unwrap();
    assert_no_lookahead(&full, &truncated, 40);
}

#[test]
fn rsi_has_no_lookahead_bias() {
    let bars = make_bars(60);
    let full = rsi::compute(&bars, 14).unwrap();
    let truncated = rsi::compute(&bars[..40], 14).unwrap();
    assert_no_lookahead(&full, &truncated, 40);
}

#[test]
fn atr_has_no_lookahead_bias() {
    let bars = make_bars(60);
    let full = atr::compute(&bars, 14).unwrap();
    let truncated = atr::compute(&bars[..40], 14).unwrap();
    assert_no_lookahead(&full, &truncated, 40);
}

#[test]
fn obv_has_no_lookahead_bias() {
    let bars = make_bars(60);
    let full = obv::compute(&bars).unwrap();
    let truncated = obv::compute(&bars[..40]).unwrap();
    assert_no_lookahead(&full, &truncated, 40);
}

#[test]
fn vwap_has_no_lookahead_bias() {
    let bars = make_bars(60);
    let full = vwap::compute(&bars).unwrap();
    let truncated = vwap::compute(&bars[..40]).unwrap();
    assert_no_lookahead(&full, &truncated, 40);
}

#[test]
fn macd_has_no_lookahead_bias() {
    let bars = make_bars(80);
    let full = macd::compute(&bars, 12, 26, 9).unwrap();
    let truncated = macd::compute(&bars[..60], 12, 26, 9).unwrap();
    assert_no_lookahead(&full, &truncated, 60);
}

#[test]
fn bollinger_has_no_lookahead_bias() {
    let bars = make_bars(60);
    let full = bollinger::compute(&bars, 20, 2.0).unwrap();
    let truncated = bollinger::compute(&bars[..40], 20, 2.0).unwrap();
    assert_no_lookahead(&full, &truncated, 40);
}

#[test]
fn stochastic_has_no_lookahead_bias() {
    let bars = make_bars(60);
    let full = stochastic::compute(&bars, 14, 3).unwrap();
    let truncated = stochastic::compute(&bars[..40], 14, 3).unwrap();
    assert_no_lookahead(&full, &truncated, 40);
}

#[test]
fn pivot_has_no_lookahead_bias() {
    let bars = make_bars(60);
    let full = pivot::compute(&bars).unwrap();
    let truncated = pivot::compute(&bars[..40]).unwrap();
    assert_no_lookahead(&full, &truncated, 40);
}
