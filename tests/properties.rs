//! Property-based tests for the engine's invariants:
//! - tiers and efficiency stay in range
//! - aggregated totals never leave 0..=200
//! - overall scores stay in 0..=100
//! - identical requests give identical output

mod common;

use buildsmith::config::AxisValues;
use buildsmith::intent::IntentParser;
use buildsmith::scorer::weighted_overall;
use buildsmith::stats::{aggregate, efficiency, tier, MAX_STAT_VALUE, MAX_TIER};
use buildsmith::*;
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "raid", "dungeon", "pvp", "trials", "solar", "void", "arc", "titan", "hunter", "warlock",
    "dps", "support", "tank", "add clear", "100 recovery", "80 discipline", "rocket launcher",
    "hand cannon", "gjallarhorn", "build", "please", "for",
];

fn axis() -> impl Strategy<Value = f64> {
    0.0..=100.0f64
}

fn axes() -> impl Strategy<Value = AxisValues> {
    (axis(), axis(), axis(), axis(), axis(), axis())
        .prop_map(|(a, b, c, d, e, f)| AxisValues::new(a, b, c, d, e, f))
}

fn weights() -> impl Strategy<Value = AxisValues> {
    let w = || 0.0..=1.0f64;
    (w(), w(), w(), w(), w(), w()).prop_map(|(a, b, c, d, e, f)| AxisValues::new(a, b, c, d, e, f))
}

fn request_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..6).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn prop_tier_and_efficiency_in_range(value in 0u32..1000) {
        prop_assert!(tier(value) <= MAX_TIER);
        let eff = efficiency(value);
        prop_assert!(eff > 0.0 && eff <= 1.0);
    }

    #[test]
    fn prop_totals_stay_clamped(stats in prop::collection::vec((0usize..6, -60i32..120), 0..12)) {
        let items: Vec<ItemDefinition> = stats
            .iter()
            .enumerate()
            .map(|(i, &(ch, v))| {
                ItemDefinition::new(&format!("piece_{i}"), "Piece", ItemKind::Armor)
                    .with_stat(StatChannel::ALL[ch], v)
            })
            .collect();
        let refs: Vec<&ItemDefinition> = items.iter().collect();
        let totals = aggregate(&refs);
        for &channel in StatChannel::ALL.iter() {
            prop_assert!(totals.get(channel) <= MAX_STAT_VALUE);
        }
    }

    #[test]
    fn prop_overall_in_range(axes in axes(), weights in weights()) {
        prop_assert!(weighted_overall(&axes, &weights) <= 100);
    }

    #[test]
    fn prop_confidence_in_unit_range(text in "\\PC{0,300}") {
        let parser = IntentParser::new(&common::catalog());
        let intent = parser.parse(&text, &RequestOptions::default());
        prop_assert!((0.0..=1.0).contains(&intent.confidence));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_recommendations_are_deterministic(text in request_text()) {
        let engine = common::engine();
        let request = BuildRequest::new(text);
        let first = engine.recommend(&request);
        let second = engine.recommend(&request);

        prop_assert!(first.score.overall_score <= 100);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        for group in [SlotGroup::Weapon, SlotGroup::Armor] {
            prop_assert!(first.build.exotic_count(group, engine.catalog()) <= 1);
        }
    }
}
