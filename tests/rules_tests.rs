use buildsmith::content::{ContentSources, ContentTables};
use buildsmith::rules::{ActiveEntry, RuleBase};
use buildsmith::*;
use std::collections::BTreeSet;

const STANCES: &str = r#"(
    version: 2,
    triggers: [
        (id: "stealth", name: "Stealth", reliability: medium, frequency: occasional,
         keywords: ["vanish"]),
        (id: "taunt", name: "Taunt", reliability: high, frequency: frequent,
         keywords: ["taunt"]),
    ],
    effects: [
        (id: "guard", name: "Guard", impact: moderate, stacking: additive,
         magnitude: 10.0, keywords: ["guard"]),
    ],
    patterns: [
        (id: "bulwark", name: "Bulwark", triggers: ["taunt"], effects: ["guard"],
         strength: medium, sustainability: sustained),
    ],
    conflicts: [
        (id: "stance", left: "stealth", right: "taunt",
         resolution: priority_order(["taunt", "stealth"])),
    ],
)"#;

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_mutually_exclusive_triggers_leave_one() {
    let rules = RuleBase::from_ron_str(STANCES).unwrap();
    let kept = rules.resolve_conflicts(vec![
        ActiveEntry::new("stealth", "Shadow Cloak", 0.0, 6.0),
        ActiveEntry::new("taunt", "Bulwark Helm", 0.0, 4.0),
    ]);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, "taunt");
}

#[test]
fn test_conflict_surfaces_in_build() {
    let content = ContentTables::from_sources(ContentSources {
        rules: STANCES,
        ..ContentSources::default()
    })
    .unwrap();
    let catalog = CatalogIndex::from_items(vec![
        ItemDefinition::new("cloak", "Shadow Cloak", ItemKind::Armor)
            .with_slot(Slot::ClassItem)
            .with_description("Dodging lets you vanish."),
        ItemDefinition::new("helm", "Warden Helm", ItemKind::Armor)
            .with_slot(Slot::Helmet)
            .with_description("Blocking will taunt nearby foes and raise your guard."),
    ])
    .unwrap();
    let engine = Engine::new(catalog, content, EngineConfig::default()).unwrap();
    let result = engine.recommend(&BuildRequest::new("tank build for strikes"));

    let conflict = result
        .build
        .conflicts
        .iter()
        .find(|c| c.id == "stance")
        .expect("stance conflict reported");
    assert_eq!(conflict.involved_ids, vec!["stealth".to_string(), "taunt".to_string()]);
    assert!(result
        .score
        .recommendations
        .iter()
        .any(|r| r.starts_with("Resolve conflict:")));
    assert!(result.build.synergies.iter().any(|s| s.id == "bulwark"));
}

#[test]
fn test_builtin_orb_loop_detected() {
    let rules = RuleBase::builtin().unwrap();
    let found = rules.detect_in_text(
        "Final blows create orbs of power. Picking up an orb grants ability energy.",
    );
    assert!(found.triggers.contains("kill"));
    assert!(found.triggers.contains("orb_pickup"));
    assert!(found.effects.contains("orb_generation"));
    assert!(found.effects.contains("ability_regen"));

    let patterns = rules.find_matching_patterns(&found.triggers, &found.effects);
    assert_eq!(patterns[0].pattern_id, "orb_economy");
    assert_eq!(patterns[0].overall_match, 1.0);

    let chains = rules.active_chains(&set(&["orb_pickup"]), &set(&["orb_generation"]));
    assert!(chains.iter().any(|c| c.self_sustaining));
}

#[test]
fn test_override_directory_falls_back_to_embedded_tables() {
    let dir = std::env::temp_dir().join(format!("buildsmith-content-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("rules.ron"), STANCES).unwrap();

    let content = ContentTables::load_dir(&dir).unwrap();
    assert_eq!(content.rules.version(), 2);
    assert_eq!(content.archetypes, ContentTables::builtin().unwrap().archetypes);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_broken_table_is_rejected() {
    let err = ContentTables::from_sources(ContentSources {
        archetypes: "[]",
        ..ContentSources::default()
    })
    .unwrap_err();
    assert!(matches!(err, EngineError::Configuration(_)));
}
