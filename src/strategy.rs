//! Strategy object: rule trees plus sizing/risk parameters (spec §3, §6).

use crate::error::{fail, EngineError, Result};
use crate::ports::ConfigSource;
use crate::rule::{self, Rule};

/// A complete tradable strategy.
#[derive(Debug, Clone)]
pub struct Strategy {
    pub name: String,
    pub description: String,
    pub entry_long: Rule,
    pub exit_long: Rule,
    pub entry_short: Option<Rule>,
    pub exit_short: Option<Rule>,
    pub position_size: f64,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub max_positions: usize,
}

impl Strategy {
    /// Load a strategy from the `[strategy]` section of a config source
    /// (spec §6 "Strategy config schema"). `entry_long`/`exit_long` are
    /// required; everything else has a documented default.
    pub fn from_config(config: &dyn ConfigSource) -> Result<Self> {
        const SECTION: &str = "strategy";

        let entry_long_text = config.get_string(SECTION, "entry_long").ok_or_else(|| {
            let err = EngineError::ConfigMissing {
                section: SECTION.to_string(),
                key: "entry_long".to_string(),
            };
            crate::error::notify(&err);
            err
        })?;
        let exit_long_text = config.get_string(SECTION, "exit_long").ok_or_else(|| {
            let err = EngineError::ConfigMissing {
                section: SECTION.to_string(),
                key: "exit_long".to_string(),
            };
            crate::error::notify(&err);
            err
        })?;

        let entry_long = rule::parse(&entry_long_text).map_err(|e| {
            crate::error::notify(&e);
            e
        })?;
        let exit_long = rule::parse(&exit_long_text).map_err(|e| {
            crate::error::notify(&e);
            e
        })?;

        let entry_short = config
            .get_string(SECTION, "entry_short")
            .map(|text| {
                rule::parse(&text).map_err(|e| {
                    crate::error::notify(&e);
                    e
                })
            })
            .transpose()?;
        let exit_short = config
            .get_string(SECTION, "exit_short")
            .map(|text| {
                rule::parse(&text).map_err(|e| {
                    crate::error::notify(&e);
                    e
                })
            })
            .transpose()?;

        let name = config
            .get_string(SECTION, "name")
            .unwrap_or_else(|| "unnamed".to_string());
        let description = config.get_string(SECTION, "description").unwrap_or_default();
        let position_size = config.get_double(SECTION, "position_size", 0.25);
        let stop_loss_pct = config.get_double(SECTION, "stop_loss", 0.0);
        let take_profit_pct = config.get_double(SECTION, "take_profit", 0.0);
        let max_positions = config.get_int(SECTION, "max_positions", 1).max(1) as usize;

        let strategy = Strategy {
            name,
            description,
            entry_long,
            exit_long,
            entry_short,
            exit_short,
            position_size,
            stop_loss_pct,
            take_profit_pct,
            max_positions,
        };
        strategy.validate()?;
        Ok(strategy)
    }

    fn validate(&self) -> Result<()> {
        if !(self.position_size > 0.0 && self.position_size <= 1.0) {
            return fail(EngineError::RuleInvalid(format!(
                "position_size must be in (0,1], got {}",
                self.position_size
            )));
        }
        if self.stop_loss_pct < 0.0 {
            return fail(EngineError::RuleInvalid("stop_loss_pct must be >= 0".into()));
        }
        if self.take_profit_pct < 0.0 {
            return fail(EngineError::RuleInvalid(
                "take_profit_pct must be >= 0".into(),
            ));
        }
        if self.max_positions < 1 {
            return fail(EngineError::RuleInvalid("max_positions must be >= 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MapConfigSource;

    fn base_config() -> MapConfigSource {
        let mut cfg = MapConfigSource::new();
        cfg.set("strategy", "entry_long", "CROSS_ABOVE(SMA(3),SMA(5))");
        cfg.set("strategy", "exit_long", "CROSS_BELOW(SMA(3),SMA(5))");
        cfg
    }

    #[test]
    fn loads_required_fields_and_defaults() {
        let cfg = base_config();
        let strategy = Strategy::from_config(&cfg).unwrap();
        assert_eq!(strategy.position_size, 0.25);
        assert_eq!(strategy.max_positions, 1);
        assert!(strategy.entry_short.is_none());
    }

    #[test]
    fn missing_required_key_errors() {
        let cfg = MapConfigSource::new();
        let err = Strategy::from_config(&cfg).unwrap_err();
        assert_eq!(err.kind(), "ConfigMissing");
    }

    #[test]
    fn rejects_out_of_range_position_size() {
        let mut cfg = base_config();
        cfg.set("strategy", "position_size", "1.5");
        assert!(Strategy::from_config(&cfg).is_err());
    }

    #[test]
    fn parses_optional_short_rules() {
        let mut cfg = base_config();
        cfg.set("strategy", "entry_short", "CROSS_BELOW(SMA(3),SMA(5))");
        cfg.set("strategy", "exit_short", "CROSS_ABOVE(SMA(3),SMA(5))");
        let strategy = Strategy::from_config(&cfg).unwrap();
        assert!(strategy.entry_short.is_some());
        assert!(strategy.exit_short.is_some());
    }

    #[test]
    fn malformed_rule_text_propagates_parse_error() {
        let mut cfg = base_config();
        cfg.set("strategy", "entry_long", "NOT_A_KEYWORD(close,1)");
        let err = Strategy::from_config(&cfg).unwrap_err();
        assert_eq!(err.kind(), "RuleParse");
    }
}
