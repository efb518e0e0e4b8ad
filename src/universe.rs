//! Universe parsing, per-code validation, and timeline construction (spec §4.6).

use crate::domain::Bar;
use crate::error::{fail, EngineError, Result};
use crate::ports::DataPort;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Minimum bars a code must have in the date window to stay in the universe.
pub const MIN_BARS: usize = 30;

/// A parsed, validated universe: unique upper-cased codes plus their exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    pub codes: Vec<String>,
    pub exchange: String,
}

/// Split on `,`, trim whitespace per token, reject empty tokens, upper-case,
/// reject duplicates after upper-casing (spec §4.6).
pub fn parse(codes_str: &str, exchange: &str) -> Result<Universe> {
    let mut codes = Vec::new();
    let mut seen = BTreeSet::new();
    for raw in codes_str.split(',') {
        let token = raw.trim();
        if token.is_empty() {
            return fail(EngineError::RuleParse(
                "universe: empty code token".to_string(),
            ));
        }
        let upper = token.to_ascii_uppercase();
        if !seen.insert(upper.clone()) {
            return fail(EngineError::RuleParse(format!(
                "universe: duplicate code '{upper}'"
            )));
        }
        codes.push(upper);
    }
    Ok(Universe {
        codes,
        exchange: exchange.to_string(),
    })
}

/// Per-code bar vector plus the indexing structures the bar loop needs
/// (spec §2 component J, §4.6 "Timeline").
#[derive(Debug, Clone)]
pub struct CodeData {
    pub code: String,
    pub bars: Vec<Bar>,
    pub date_to_index: HashMap<NaiveDate, usize>,
}

impl CodeData {
    fn new(code: String, bars: Vec<Bar>) -> Self {
        let date_to_index = bars
            .iter()
            .enumerate()
            .map(|(i, b)| (b.date, i))
            .collect();
        CodeData {
            code,
            bars,
            date_to_index,
        }
    }
}

/// Fetch bars for every code in `universe` via `data`, dropping codes with
/// fewer than [`MIN_BARS`] bars in range. Returns the remaining `CodeData`
/// set, or an error if none remain.
pub fn validate(
    universe: &Universe,
    data: &dyn DataPort,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<CodeData>> {
    let mut kept = Vec::new();
    for code in &universe.codes {
        let bars = data.fetch_ohlcv(code, &universe.exchange, start, end)?;
        if bars.len() >= MIN_BARS {
            kept.push(CodeData::new(code.clone(), bars));
        }
    }
    if kept.is_empty() {
        return fail(EngineError::InsufficientData {
            code: universe.codes.join(","),
            available: 0,
            required: MIN_BARS,
        });
    }
    Ok(kept)
}

/// Sorted, deduplicated union of dates across every code's bars (spec §4.6).
pub fn merge_timeline(codes: &[CodeData]) -> Vec<NaiveDate> {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    for code in codes {
        for bar in &code.bars {
            dates.insert(bar.date);
        }
    }
    dates.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use std::collections::HashMap as StdHashMap;

    struct FakeData(StdHashMap<String, Vec<Bar>>);

    impl DataPort for FakeData {
        fn fetch_ohlcv(
            &self,
            code: &str,
            _exchange: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<Bar>> {
            Ok(self.0.get(code).cloned().unwrap_or_default())
        }
        fn list_symbols(&self, _exchange: Option<&str>) -> Result<Vec<String>> {
            Ok(self.0.keys().cloned().collect())
        }
    }

    fn bars(n: usize, code: &str) -> Vec<Bar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        (0..n)
            .map(|i| Bar {
                code: code.to_string(),
                exchange: "X".into(),
                date: base + chrono::Duration::days(i as i64),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn parse_upper_cases_and_trims() {
        let u = parse("  cba , bhp ", "ASX").unwrap();
        assert_eq!(u.codes, vec!["CBA".to_string(), "BHP".to_string()]);
    }

    #[test]
    fn parse_rejects_duplicates_after_upper_casing() {
        assert!(parse("a,A", "ASX").is_err());
    }

    #[test]
    fn parse_rejects_empty_tokens() {
        assert!(parse("A,,B", "ASX").is_err());
    }

    #[test]
    fn validate_drops_codes_under_min_bars() {
        let mut map = StdHashMap::new();
        map.insert("CBA".to_string(), bars(40, "CBA"));
        map.insert("BHP".to_string(), bars(5, "BHP"));
        let data = FakeData(map);
        let universe = parse("cba,bhp", "ASX").unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let kept = validate(&universe, &data, start, end).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].code, "CBA");
    }

    #[test]
    fn validate_errors_when_nothing_remains() {
        let data = FakeData(StdHashMap::new());
        let universe = parse("cba", "ASX").unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert!(validate(&universe, &data, start, end).is_err());
    }

    #[test]
    fn merge_timeline_is_sorted_deduped_union() {
        let a = CodeData::new("A".into(), bars(3, "A"));
        let b = CodeData::new("B".into(), bars(5, "B"));
        let timeline = merge_timeline(&[a, b]);
        assert_eq!(timeline.len(), 5);
        assert!(timeline.windows(2).all(|w| w[0] < w[1]));
    }
}
