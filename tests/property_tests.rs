//! Property-based tests for the rule grammar's round-trip guarantee and
//! universe parsing's case/whitespace normalization (spec §8 "Round-trip").

use backtest_engine::rule::ast::{CompareOp, CompositeOp, Rule};
use backtest_engine::rule::operand::Operand;
use backtest_engine::rule::parse;
use backtest_engine::universe;
use proptest::prelude::*;

fn arb_price_operand() -> impl Strategy<Value = Operand> {
    prop_oneof![
        Just(Operand::PriceOpen),
        Just(Operand::PriceHigh),
        Just(Operand::PriceLow),
        Just(Operand::PriceClose),
        Just(Operand::Volume),
    ]
}

fn arb_constant() -> impl Strategy<Value = Operand> {
    (-10_000.0..10_000.0_f64).prop_map(Operand::Constant)
}

fn arb_compare_op() -> impl Strategy<Value = CompareOp> {
    prop_oneof![
        Just(CompareOp::CrossAbove),
        Just(CompareOp::CrossBelow),
        Just(CompareOp::Above),
        Just(CompareOp::Below),
        Just(CompareOp::Equals),
    ]
}

fn arb_comparison_rule() -> impl Strategy<Value = Rule> {
    (arb_compare_op(), arb_price_operand(), arb_constant()).prop_map(|(op, left, right)| Rule::Comparison { op, left, right })
}

fn arb_between_rule() -> impl Strategy<Value = Rule> {
    (arb_price_operand(), -10_000.0..10_000.0_f64, 0.0..10_000.0_f64).prop_map(|(value, lower, span)| Rule::Between {
        value,
        lower,
        upper: lower + span,
    })
}

fn arb_leaf_rule() -> impl Strategy<Value = Rule> {
    prop_oneof![arb_comparison_rule(), arb_between_rule()]
}

fn arb_composite_rule() -> impl Strategy<Value = Rule> {
    (prop_oneof![Just(CompositeOp::And), Just(CompositeOp::Or)], prop::collection::vec(arb_leaf_rule(), 2..5))
        .prop_map(|(op, children)| Rule::Composite { op, children })
}

proptest! {
    #[test]
    fn comparison_rule_text_round_trips(rule in arb_comparison_rule()) {
        let text = rule.render();
        let reparsed = parse(&text).unwrap();
        prop_assert_eq!(&rule, &reparsed);
        prop_assert_eq!(text, reparsed.render());
    }

    #[test]
    fn between_rule_text_round_trips(rule in arb_between_rule()) {
        let text = rule.render();
        let reparsed = parse(&text).unwrap();
        prop_assert_eq!(&rule, &reparsed);
    }

    #[test]
    fn composite_rule_text_round_trips(rule in arb_composite_rule()) {
        let text = rule.render();
        let reparsed = parse(&text).unwrap();
        prop_assert_eq!(rule, reparsed);
    }

    #[test]
    fn not_wrapped_rule_round_trips(inner in arb_leaf_rule()) {
        let rule = Rule::Not { child: Box::new(inner) };
        let text = rule.render();
        let reparsed = parse(&text).unwrap();
        prop_assert_eq!(rule, reparsed);
    }

    /// Codes made only of letters/digits, upper-cased and comma-joined with
    /// arbitrary surrounding whitespace, must parse back to the deduplicated
    /// upper-case set with preserved order.
    #[test]
    fn universe_parse_upper_cases_and_preserves_order(codes in prop::collection::vec("[a-zA-Z]{1,5}", 1..6)) {
        let mut seen = std::collections::BTreeSet::new();
        let unique: Vec<String> = codes
            .into_iter()
            .filter(|c| seen.insert(c.to_ascii_uppercase()))
            .collect();
        let joined = unique
            .iter()
            .map(|c| format!("  {c}  "))
            .collect::<Vec<_>>()
            .join(",");
        let universe = universe::parse(&joined, "ASX").unwrap();
        let expected: Vec<String> = unique.iter().map(|c| c.to_ascii_uppercase()).collect();
        prop_assert_eq!(universe.codes, expected);
    }

    #[test]
    fn universe_parse_rejects_case_insensitive_duplicates(code in "[a-zA-Z]{1,5}") {
        let lower = code.to_ascii_lowercase();
        let upper = code.to_ascii_uppercase();
        let joined = format!("{lower},{upper}");
        prop_assert!(universe::parse(&joined, "ASX").is_err());
    }
}
