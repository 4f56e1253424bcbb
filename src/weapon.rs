//! Weapon profiles and the weapon scorer.

use crate::catalog::{DamageElement, ItemDefinition, Rarity, WeaponType};
use crate::intent::{Activity, BuildIntent, Playstyle};
use serde::{Deserialize, Serialize};

/// Fit used when a weapon type has no profile or no entry for a context.
pub const NEUTRAL_FIT: f64 = 0.5;

/// How well one weapon type suits each activity and playstyle (0–1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub weapon_type: WeaponType,
    #[serde(default)]
    pub activity_fit: Vec<(Activity, f64)>,
    #[serde(default)]
    pub playstyle_fit: Vec<(Playstyle, f64)>,
}

impl WeaponProfile {
    pub fn activity_fit(&self, activity: Activity) -> f64 {
        lookup(&self.activity_fit, activity)
    }

    pub fn playstyle_fit(&self, playstyle: Playstyle) -> f64 {
        lookup(&self.playstyle_fit, playstyle)
    }
}

fn lookup<K: PartialEq + Copy>(table: &[(K, f64)], key: K) -> f64 {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(NEUTRAL_FIT, |&(_, v)| v.clamp(0.0, 1.0))
}

/// Profile for a weapon type, if one is declared.
pub fn profile_for(profiles: &[WeaponProfile], weapon_type: Option<WeaponType>) -> Option<&WeaponProfile> {
    let weapon_type = weapon_type?;
    profiles.iter().find(|p| p.weapon_type == weapon_type)
}

/// Activity fit of a weapon item (0–1).
pub fn weapon_activity_fit(profiles: &[WeaponProfile], item: &ItemDefinition, activity: Activity) -> f64 {
    profile_for(profiles, item.weapon_type).map_or(NEUTRAL_FIT, |p| p.activity_fit(activity))
}

/// Rarity component of a weapon score.
pub fn rarity_bonus(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Exotic => 22.0,
        Rarity::Legendary => 12.0,
        Rarity::Rare => 6.0,
        Rarity::Uncommon => 3.0,
        Rarity::Common => 0.0,
    }
}

/// Element component (0–1): full for a match or when any element will do,
/// half for kinetic weapons which never clash with a subclass.
fn element_fit(item: DamageElement, wanted: Option<DamageElement>) -> f64 {
    match wanted {
        None => 1.0,
        Some(w) if w == item => 1.0,
        Some(_) if matches!(item, DamageElement::Kinetic | DamageElement::Untyped) => 0.5,
        Some(_) => 0.0,
    }
}

/// A weapon's score with the reasons behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponScore {
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Score a weapon for an intent, 0–100.
///
/// `35·activity fit + 25·playstyle fit + 15·element fit + rarity bonus`,
/// plus 5 when the weapon type was asked for by name.
///
/// # Examples
///
/// ```rust
/// use buildsmith::intent::{Activity, BuildIntent, Playstyle};
/// use buildsmith::weapon::{score_weapon, WeaponProfile};
/// use buildsmith::{ItemDefinition, ItemKind, Rarity, WeaponType};
///
/// let profiles = vec![WeaponProfile {
///     weapon_type: WeaponType::RocketLauncher,
///     activity_fit: vec![(Activity::Raid, 1.0)],
///     playstyle_fit: vec![(Playstyle::Dps, 1.0)],
/// }];
/// let rocket = ItemDefinition::new("gjally", "Gjallarhorn", ItemKind::Weapon)
///     .with_weapon_type(WeaponType::RocketLauncher)
///     .with_rarity(Rarity::Exotic);
/// let intent = BuildIntent {
///     activity: Activity::Raid,
///     playstyle: Playstyle::Dps,
///     ..BuildIntent::default()
/// };
///
/// assert_eq!(score_weapon(&profiles, &rocket, &intent).score, 97.0);
/// ```
pub fn score_weapon(profiles: &[WeaponProfile], item: &ItemDefinition, intent: &BuildIntent) -> WeaponScore {
    let profile = profile_for(profiles, item.weapon_type);
    let activity = profile.map_or(NEUTRAL_FIT, |p| p.activity_fit(intent.activity));
    let playstyle = profile.map_or(NEUTRAL_FIT, |p| p.playstyle_fit(intent.playstyle));
    let element = element_fit(item.damage_element, intent.element);
    let rarity = rarity_bonus(item.rarity);
    let mentioned = item
        .weapon_type
        .is_some_and(|t| intent.weapon_types.contains(&t));

    let mut reasons = Vec::new();
    if activity >= 0.8 {
        reasons.push(format!("strong fit for {}", intent.activity));
    }
    if playstyle >= 0.8 {
        reasons.push(format!("suits {} play", intent.playstyle));
    }
    if let Some(wanted) = intent.element {
        if element >= 1.0 {
            reasons.push(format!("matches {wanted} element"));
        }
    }
    if item.is_exotic() {
        reasons.push("exotic".to_string());
    }
    if mentioned {
        reasons.push("requested weapon type".to_string());
    }

    let score = 35.0 * activity
        + 25.0 * playstyle
        + 15.0 * element
        + rarity
        + if mentioned { 5.0 } else { 0.0 };

    WeaponScore {
        score: score.clamp(0.0, 100.0),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemKind;

    fn profiles() -> Vec<WeaponProfile> {
        vec![WeaponProfile {
            weapon_type: WeaponType::HandCannon,
            activity_fit: vec![(Activity::Crucible, 0.9), (Activity::Raid, 0.3)],
            playstyle_fit: vec![(Playstyle::Aggressive, 0.8)],
        }]
    }

    fn hand_cannon() -> ItemDefinition {
        ItemDefinition::new("hc", "Hand Cannon", ItemKind::Weapon)
            .with_weapon_type(WeaponType::HandCannon)
            .with_element(DamageElement::Kinetic)
            .with_rarity(Rarity::Legendary)
    }

    #[test]
    fn test_profile_lookup_and_neutral_fallback() {
        let p = &profiles()[0];
        assert_eq!(p.activity_fit(Activity::Crucible), 0.9);
        assert_eq!(p.activity_fit(Activity::Gambit), NEUTRAL_FIT);
    }

    #[test]
    fn test_score_components() {
        let intent = BuildIntent {
            activity: Activity::Crucible,
            playstyle: Playstyle::Aggressive,
            element: Some(DamageElement::Void),
            ..BuildIntent::default()
        };
        let scored = score_weapon(&profiles(), &hand_cannon(), &intent);
        // 35*0.9 + 25*0.8 + 15*0.5 + 12
        assert!((scored.score - 71.0).abs() < 1e-9);
        assert!(scored.reasons.iter().any(|r| r.contains("crucible")));
    }

    #[test]
    fn test_requested_type_bonus_and_cap() {
        let intent = BuildIntent {
            activity: Activity::Crucible,
            playstyle: Playstyle::Aggressive,
            weapon_types: vec![WeaponType::HandCannon],
            ..BuildIntent::default()
        };
        let exotic = hand_cannon().with_rarity(Rarity::Exotic);
        let scored = score_weapon(&profiles(), &exotic, &intent);
        // 31.5 + 20 + 15 + 22 + 5 = 93.5
        assert!((scored.score - 93.5).abs() < 1e-9);
    }

    #[test]
    fn test_unprofiled_weapon_is_neutral() {
        let item = ItemDefinition::new("x", "X", ItemKind::Weapon);
        let scored = score_weapon(&[], &item, &BuildIntent::default());
        // 17.5 + 12.5 + 15
        assert!((scored.score - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_element_mismatch() {
        assert_eq!(element_fit(DamageElement::Arc, Some(DamageElement::Solar)), 0.0);
        assert_eq!(element_fit(DamageElement::Kinetic, Some(DamageElement::Solar)), 0.5);
        assert_eq!(element_fit(DamageElement::Arc, None), 1.0);
    }
}
