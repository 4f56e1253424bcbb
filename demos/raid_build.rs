//! Raid build example: parse a request, assemble a build and explain its score
//!
//! This example demonstrates:
//! - Building a catalog from item definitions
//! - Recommending a build from free text
//! - Reading slot reasoning, synergies and diagnostics
//!
//! Run with `RUST_LOG=buildsmith=debug` to see the engine's decisions.

use buildsmith::catalog::SubclassRole;
use buildsmith::*;
use tracing_subscriber::EnvFilter;

fn catalog() -> Result<CatalogIndex, EngineError> {
    CatalogIndex::from_items(vec![
        ItemDefinition::new("fatebringer", "Fatebringer", ItemKind::Weapon)
            .with_slot(Slot::Kinetic)
            .with_weapon_type(WeaponType::HandCannon)
            .with_rarity(Rarity::Legendary),
        ItemDefinition::new("calus_mini_tool", "CALUS Mini-Tool", ItemKind::Weapon)
            .with_slot(Slot::Energy)
            .with_weapon_type(WeaponType::SubmachineGun)
            .with_element(DamageElement::Solar)
            .with_rarity(Rarity::Legendary)
            .with_description("Final blows create a sunspot that lets you become radiant."),
        ItemDefinition::new("gjallarhorn", "Gjallarhorn", ItemKind::Weapon)
            .with_slot(Slot::Power)
            .with_weapon_type(WeaponType::RocketLauncher)
            .with_element(DamageElement::Solar)
            .with_rarity(Rarity::Exotic),
        ItemDefinition::new("solstice_hood", "Solstice Hood", ItemKind::Armor)
            .with_slot(Slot::Helmet)
            .with_rarity(Rarity::Legendary)
            .with_stat(StatChannel::Discipline, 20)
            .with_stat(StatChannel::Resilience, 12),
        ItemDefinition::new("solstice_gloves", "Solstice Gloves", ItemKind::Armor)
            .with_slot(Slot::Arms)
            .with_rarity(Rarity::Legendary)
            .with_stat(StatChannel::Intellect, 18)
            .with_stat(StatChannel::Recovery, 10),
        ItemDefinition::new("solstice_robes", "Solstice Robes", ItemKind::Armor)
            .with_slot(Slot::Chest)
            .with_rarity(Rarity::Legendary)
            .with_stat(StatChannel::Resilience, 24)
            .with_stat(StatChannel::Discipline, 10),
        ItemDefinition::new("solstice_boots", "Solstice Boots", ItemKind::Armor)
            .with_slot(Slot::Legs)
            .with_rarity(Rarity::Legendary)
            .with_stat(StatChannel::Recovery, 22),
        ItemDefinition::new("well", "Well of Radiance", ItemKind::SubclassComponent)
            .with_element(DamageElement::Solar)
            .with_role(SubclassRole::Super)
            .with_description("Allies inside are radiant and receive healing."),
        ItemDefinition::new("heat_rises", "Heat Rises", ItemKind::SubclassComponent)
            .with_element(DamageElement::Solar)
            .with_role(SubclassRole::Aspect)
            .with_description("Final blows while airborne grant melee energy."),
    ])
}

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Raid Build Demo ===\n");

    let engine = Engine::with_defaults(catalog()?)?;
    let request = BuildRequest::new("solar warlock raid dps with 100 resilience").with_options(
        RequestOptions {
            include_alternatives: true,
            ..RequestOptions::default()
        },
    );
    let result = engine.recommend(&request);

    println!(
        "Intent: {} {} for {} (confidence {:.2})\n",
        result.intent.target_class, result.intent.playstyle, result.intent.activity, result.intent.confidence
    );

    let build = &result.build;
    println!("Archetype: {}", build.archetype);
    if let Some(element) = build.subclass.element {
        println!("Subclass: {element}");
        for component in &build.subclass.components {
            println!("  {} ({})", component.name, component.role);
        }
    }

    println!("\nSlots:");
    for assignment in build.assignments() {
        let name = assignment
            .chosen
            .as_ref()
            .map_or("(empty)", |c| c.item_name.as_str());
        println!("  {:<10} {:<18} {}", assignment.slot.to_string(), name, assignment.reasoning);
    }

    println!("\nStats:");
    for (channel, value) in build.stats.iter() {
        println!("  {:<11} {value:>3}  tier {}", channel.to_string(), stats::tier(value));
    }

    println!("\nSynergies:");
    for synergy in &build.synergies {
        println!("  [{}] {}", synergy.strength, synergy.description);
    }
    for diagnostic in &build.diagnostics {
        println!("  ! {}", serde_json::to_string(diagnostic).unwrap_or_default());
    }

    let score = &result.score;
    println!("\nOverall score: {}/100", score.overall_score);
    for strength in &score.strengths {
        println!("  + {strength}");
    }
    for weakness in &score.weaknesses {
        println!("  - {weakness}");
    }
    for advice in &score.recommendations {
        println!("  > {advice}");
    }

    println!("\nAlternatives:");
    for alternative in &result.alternatives {
        println!("  {} scores {}", alternative.build.archetype, alternative.score.overall_score);
    }

    Ok(())
}
