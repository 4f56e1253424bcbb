mod common;

use buildsmith::build::Diagnostic;
use buildsmith::*;

#[test]
fn test_raid_dps_takes_the_exotic_rocket() {
    common::init_tracing();
    let engine = common::engine();
    let result = engine.recommend(&BuildRequest::new("raid dps build"));

    assert_eq!(result.intent.activity, Activity::Raid);
    assert_eq!(result.intent.playstyle, Playstyle::Dps);
    assert_eq!(result.build.archetype, "Raid DPS");

    let power = result.build.assignment(Slot::Power).unwrap();
    let chosen = power.chosen.as_ref().unwrap();
    assert_eq!(chosen.item_id.as_str(), "w_power_rocket");
    assert!(chosen.score >= 95.0, "rocket scored {}", chosen.score);
    assert!(chosen.reasons.iter().any(|r| r == "exotic"));

    assert!(result.score.exotic_utilization >= 80.0);
    assert!(result.score.overall_score <= 100);
}

#[test]
fn test_numeric_target_drives_armor() {
    let engine = common::engine();
    let result = engine.recommend(&BuildRequest::new("warlock build with 100 recovery"));

    assert_eq!(result.intent.target_class, ClassAffinity::Warlock);
    assert_eq!(result.intent.numeric_constraints.get(&StatChannel::Recovery), Some(&100));
    assert_eq!(result.intent.priority_stats.first(), Some(&StatChannel::Recovery));
    assert!(result.intent.confidence >= 0.5);

    let build = &result.build;
    assert_eq!(build.chosen(Slot::Chest).map(ItemId::as_str), Some("a_chest_res"));
    assert_eq!(build.chosen(Slot::Legs).map(ItemId::as_str), Some("a_legs_rec"));
    assert!(build.stats.get(StatChannel::Recovery) > 0);
    assert!(!build
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::InfeasibleConstraint { .. })));
}

#[test]
fn test_class_filter_excludes_other_classes() {
    let engine = common::engine();
    let result = engine.recommend(&BuildRequest::new("hunter build for strikes"));

    let equipped = result.build.equipped(engine.catalog());
    assert!(equipped
        .iter()
        .all(|item| item.class_affinity.accepts(ClassAffinity::Hunter)));
    assert_ne!(result.build.chosen(Slot::ClassItem).map(ItemId::as_str), Some("a_class_bond"));
}

#[test]
fn test_unreachable_target_is_reported() {
    let engine = common::engine();
    let result = engine.recommend(&BuildRequest::new("titan with 200 mobility"));

    assert!(result.build.diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::InfeasibleConstraint { channel: StatChannel::Mobility, required: 200, .. }
    )));
}

#[test]
fn test_four_digit_target_is_kept_and_reported() {
    let engine = common::engine();
    let intent = engine.parse(&BuildRequest::new("1000 recovery"));
    assert_eq!(intent.numeric_constraints.get(&StatChannel::Recovery), Some(&1000));

    let result = engine.recommend(&BuildRequest::new("warlock build with 1000 recovery"));
    assert!(result.build.diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::InfeasibleConstraint { channel: StatChannel::Recovery, required: 1000, .. }
    )));
}

#[test]
fn test_empty_slots_reported_not_fatal() {
    let engine = Engine::from_items(vec![
        ItemDefinition::new("helm", "Lonely Helm", ItemKind::Armor)
            .with_slot(Slot::Helmet)
            .with_stat(StatChannel::Resilience, 15),
        ItemDefinition::new("sidearm", "Pocket Sidearm", ItemKind::Weapon)
            .with_slot(Slot::Kinetic)
            .with_weapon_type(WeaponType::Sidearm),
    ])
    .unwrap();
    let result = engine.recommend(&BuildRequest::new("crucible build please"));

    assert_eq!(result.build.chosen(Slot::Helmet).map(ItemId::as_str), Some("helm"));
    for slot in [Slot::Energy, Slot::Power, Slot::Arms, Slot::Chest, Slot::Legs, Slot::ClassItem] {
        assert!(result.build.chosen(slot).is_none());
        assert!(result
            .build
            .diagnostics
            .contains(&Diagnostic::NoCandidateFound { slot }));
    }
    assert!(result
        .score
        .recommendations
        .iter()
        .any(|r| r.contains("class_item")));
    assert!(result.score.overall_score <= 100);
}

#[test]
fn test_locked_item_from_text() {
    let engine = common::engine();
    let result = engine.recommend(&BuildRequest::new("nightfall build with gjallarhorn"));

    assert_eq!(result.intent.locked_items, vec![ItemId::new("w_power_rocket")]);
    let power = result.build.assignment(Slot::Power).unwrap();
    assert!(power.locked);
    assert_eq!(power.chosen_id().map(ItemId::as_str), Some("w_power_rocket"));
}

#[test]
fn test_inventory_only_restricts_candidates() {
    let catalog = common::catalog().with_inventory([ItemId::new("a_helm_res"), ItemId::new("w_kinetic_hc")]);
    let engine = Engine::with_defaults(catalog).unwrap();
    let request = BuildRequest::new("raid build").with_options(RequestOptions {
        use_inventory_only: Some(true),
        ..RequestOptions::default()
    });
    let result = engine.recommend(&request);

    assert_eq!(result.build.chosen(Slot::Helmet).map(ItemId::as_str), Some("a_helm_res"));
    assert_eq!(result.build.chosen(Slot::Kinetic).map(ItemId::as_str), Some("w_kinetic_hc"));
    assert!(result.build.chosen(Slot::Power).is_none());
}

#[test]
fn test_at_most_one_exotic_per_group() {
    let engine = common::engine();
    for text in [
        "raid dps build",
        "pvp hand cannon aggressive",
        "solar warlock support for nightfall",
        "gambit add clear",
        "build",
    ] {
        let result = engine.recommend(&BuildRequest::new(text));
        for group in [SlotGroup::Weapon, SlotGroup::Armor] {
            assert!(
                result.build.exotic_count(group, engine.catalog()) <= 1,
                "{text}: more than one exotic in {group:?}"
            );
        }
    }
}

#[test]
fn test_output_is_deterministic() {
    let request = BuildRequest::new("solar warlock raid dps with 80 discipline").with_options(RequestOptions {
        include_alternatives: true,
        ..RequestOptions::default()
    });
    let first = serde_json::to_string(&common::engine().recommend(&request)).unwrap();
    let second = serde_json::to_string(&common::engine().recommend(&request)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_rescoring_is_idempotent() {
    let engine = common::engine();
    let result = engine.recommend(&BuildRequest::new("void titan tank for dungeons"));
    let again = engine.score(&result.build, &result.intent);
    assert_eq!(again, result.score);
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = common::engine();
    let request = BuildRequest::new("raid dps build");
    let expected = serde_json::to_string(&engine.recommend(&request)).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| serde_json::to_string(&engine.recommend(&request)).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_low_confidence_flagged() {
    let engine = common::engine();
    let result = engine.recommend(&BuildRequest::new("hm"));
    assert!(result.intent.confidence < engine.config().low_confidence_threshold);
    assert!(result
        .build
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::LowConfidence { .. })));
}
