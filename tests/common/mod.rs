#![allow(dead_code)]

use buildsmith::catalog::{PieceQuality, SubclassRole};
use buildsmith::*;

fn weapon(id: &str, name: &str, slot: Slot, weapon_type: WeaponType) -> ItemDefinition {
    ItemDefinition::new(id, name, ItemKind::Weapon)
        .with_slot(slot)
        .with_weapon_type(weapon_type)
        .with_rarity(Rarity::Legendary)
}

fn armor(id: &str, name: &str, slot: Slot, stats: &[(StatChannel, i32)]) -> ItemDefinition {
    stats.iter().fold(
        ItemDefinition::new(id, name, ItemKind::Armor)
            .with_slot(slot)
            .with_rarity(Rarity::Legendary),
        |item, &(ch, v)| item.with_stat(ch, v),
    )
}

fn component(id: &str, name: &str, element: DamageElement, role: SubclassRole, text: &str) -> ItemDefinition {
    ItemDefinition::new(id, name, ItemKind::SubclassComponent)
        .with_element(element)
        .with_role(role)
        .with_description(text)
}

/// A small catalog covering every slot, with a single exotic in the power slot.
pub fn items() -> Vec<ItemDefinition> {
    use StatChannel::*;
    vec![
        // weapons
        weapon("w_kinetic_hc", "Trusty Hand Cannon", Slot::Kinetic, WeaponType::HandCannon),
        weapon("w_kinetic_ar", "Steady Auto Rifle", Slot::Kinetic, WeaponType::AutoRifle),
        weapon("w_energy_sniper", "Long Sight", Slot::Energy, WeaponType::SniperRifle)
            .with_element(DamageElement::Solar),
        weapon("w_energy_smg", "Buzzsaw", Slot::Energy, WeaponType::SubmachineGun)
            .with_element(DamageElement::Arc),
        weapon("w_power_gl", "Thumper", Slot::Power, WeaponType::GrenadeLauncher)
            .with_element(DamageElement::Void),
        ItemDefinition::new("w_power_rocket", "Gjallarhorn", ItemKind::Weapon)
            .with_slot(Slot::Power)
            .with_weapon_type(WeaponType::RocketLauncher)
            .with_element(DamageElement::Solar)
            .with_rarity(Rarity::Exotic)
            .with_description("Rockets that split into tracking submunitions."),
        // armor
        armor("a_helm_res", "Bulwark Helm", Slot::Helmet, &[(Resilience, 20), (Recovery, 12), (Discipline, 6)]),
        armor("a_helm_disc", "Focus Helm", Slot::Helmet, &[(Discipline, 22), (Intellect, 10)])
            .with_quality(PieceQuality::Masterworked),
        armor("a_arms_disc", "Grenadier Gauntlets", Slot::Arms, &[(Discipline, 20), (Strength, 10)]),
        armor("a_arms_mob", "Sprinter Grips", Slot::Arms, &[(Mobility, 24), (Recovery, 6)]),
        armor("a_chest_res", "Bastion Plate", Slot::Chest, &[(Resilience, 24), (Recovery, 14)]),
        armor("a_chest_int", "Scholar Robes", Slot::Chest, &[(Intellect, 20), (Discipline, 12)]),
        armor("a_legs_rec", "Mender Greaves", Slot::Legs, &[(Recovery, 22), (Resilience, 10)]),
        armor("a_legs_titan", "Titan Greaves", Slot::Legs, &[(Resilience, 30), (Discipline, 20)])
            .with_class(ClassAffinity::Titan),
        armor("a_class_bond", "Radiant Bond", Slot::ClassItem, &[(Intellect, 8), (Discipline, 8)])
            .with_class(ClassAffinity::Warlock),
        armor("a_class_cloak", "Plain Cloak", Slot::ClassItem, &[(Recovery, 6)]),
        // subclass
        component("s_solar_super", "Well of Radiance", DamageElement::Solar, SubclassRole::Super,
            "Grants radiant allies healing inside the well."),
        component("s_solar_aspect_heat", "Heat Rises", DamageElement::Solar, SubclassRole::Aspect,
            "Consume your grenade to gain ability energy on final blows."),
        component("s_solar_aspect_touch", "Touch of Flame", DamageElement::Solar, SubclassRole::Aspect,
            "Grenades scorch and ignite targets."),
        component("s_solar_frag_ember", "Ember of Torches", DamageElement::Solar, SubclassRole::Fragment,
            "Melee final blows make you and allies radiant."),
        component("s_arc_super", "Stormtrance", DamageElement::Arc, SubclassRole::Super,
            "Chain lightning that can jolt targets."),
        // mods
        ItemDefinition::new("m_res", "Resilience Mod", ItemKind::Mod)
            .with_stat(Resilience, 10),
        ItemDefinition::new("m_disc", "Discipline Mod", ItemKind::Mod)
            .with_stat(Discipline, 10),
        ItemDefinition::new("m_surge", "Solar Weapon Surge", ItemKind::Mod)
            .with_description("Grants weapon damage for matching weapons."),
        ItemDefinition::new("m_targeting", "Hand Cannon Targeting", ItemKind::Mod)
            .with_description("Improves targeting and aim assist."),
    ]
}

pub fn catalog() -> CatalogIndex {
    CatalogIndex::from_items(items()).unwrap()
}

pub fn engine() -> Engine {
    Engine::with_defaults(catalog()).unwrap()
}

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
