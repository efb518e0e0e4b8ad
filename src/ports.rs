//! External interfaces the core depends on but does not implement (spec §6).
//!
//! Data sourcing, config loading, and report writing are explicitly out of
//! scope (spec §1 Non-goals): the core only declares the traits it calls
//! through and a lightweight in-memory reference implementation for tests.

use crate::domain::{ClosedTrade, EquityPoint};
use crate::error::{EngineError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Source of OHLCV bars for a code (spec §6 "Data port").
pub trait DataPort: Send + Sync {
    /// Fetch bars for `code` on `exchange` between `start` and `end`
    /// (inclusive), sorted ascending by date. An empty sequence is a valid,
    /// non-error result.
    fn fetch_ohlcv(
        &self,
        code: &str,
        exchange: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<crate::domain::Bar>>;

    /// List known symbols, optionally scoped to one exchange.
    fn list_symbols(&self, exchange: Option<&str>) -> Result<Vec<String>>;

    /// Release any underlying connection. A no-op for in-memory sources.
    fn close(&self) {}
}

/// Source of typed config values (spec §6 "Config source").
///
/// Booleans recognize `{true,false,yes,no,on,off,1,0}` case-insensitively;
/// anything else yields the caller's default.
pub trait ConfigSource {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}

/// Sink for a finished run's results (spec §6 "Report port").
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, strategy_name: &str, path: &str) -> Result<()>;
    fn write_multi(&self, results: &[PerCodeResult], strategy_name: &str, path: &str) -> Result<()>;
}

/// All metric fields plus the raw sequences they were derived from (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub metrics: crate::metrics::AggregateMetrics,
    pub equity_curve: Vec<EquityPoint>,
    pub closed_trades: Vec<ClosedTrade>,
}

/// One code's slice of a multi-code run (spec §4.7 "Per-code").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerCodeResult {
    pub code: String,
    pub stats: crate::metrics::PerCodeStats,
}

/// In-memory [`ConfigSource`] — the reference implementation used by tests
/// and by any embedder that already has configuration in hand.
#[derive(Debug, Clone, Default)]
pub struct MapConfigSource {
    values: HashMap<(String, String), String>,
}

impl MapConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) -> &mut Self {
        self.values
            .insert((section.to_string(), key.to_string()), value.into());
        self
    }
}

impl ConfigSource for MapConfigSource {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .cloned()
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_string(section, key)
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.get_string(section, key) {
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => true,
                "false" | "no" | "off" | "0" => false,
                _ => default,
            },
            None => default,
        }
    }
}

/// Load a [`ConfigSource`] section as a missing-key-aware lookup, invoking
/// the error hook and returning [`EngineError::ConfigMissing`] on a required
/// key that is absent.
pub fn require_string(
    config: &dyn ConfigSource,
    section: &str,
    key: &str,
) -> Result<String> {
    config.get_string(section, key).ok_or_else(|| {
        let err = EngineError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        };
        crate::error::notify(&err);
        err
    })
}
