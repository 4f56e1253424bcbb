//! Raw manifest normalization.
//!
//! Manifest exports are loosely shaped: rarity may be a name or an ordinal,
//! stats may be keyed by channel name or by numeric manifest hash, and enum
//! fields arrive as free strings. Everything is normalized here into the
//! canonical [`ItemDefinition`] so nothing downstream has to guess.

use super::item::{
    ClassAffinity, DamageElement, ItemDefinition, ItemKind, PieceQuality, Rarity, Slot,
    SubclassRole, WeaponType,
};
use crate::error::EngineError;
use crate::item_id::ItemId;
use crate::stats::StatChannel;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Rarity as it appears in exports: `"exotic"` or `4`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRarity {
    Rank(u8),
    Name(String),
}

/// One item record exactly as the manifest provider delivers it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "item_type")]
    pub kind: String,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default, alias = "tier")]
    pub rarity: Option<RawRarity>,
    #[serde(default, alias = "class")]
    pub class_affinity: Option<String>,
    #[serde(default, alias = "element")]
    pub damage_element: Option<String>,
    #[serde(default)]
    pub weapon_type: Option<String>,
    #[serde(default)]
    pub subclass_role: Option<String>,
    /// Keys are channel names or decimal manifest stat hashes.
    #[serde(default)]
    pub stats: BTreeMap<String, i32>,
    #[serde(default)]
    pub masterworked: bool,
    #[serde(default)]
    pub tuned_stat: Option<String>,
}

/// Outcome of normalizing a manifest: accepted items and skipped ids.
#[derive(Debug, Clone, Default)]
pub struct NormalizedManifest {
    pub items: Vec<ItemDefinition>,
    pub skipped: Vec<(ItemId, String)>,
}

/// Parse a JSON object mapping item id to raw record.
pub fn parse_manifest_json(json: &str) -> Result<NormalizedManifest, EngineError> {
    let raw: BTreeMap<String, RawItem> =
        serde_json::from_str(json).map_err(|e| EngineError::parse("item manifest", e))?;
    Ok(normalize(raw))
}

/// Normalize raw records, skipping (and reporting) any that cannot be typed.
pub fn normalize(raw: BTreeMap<String, RawItem>) -> NormalizedManifest {
    let mut out = NormalizedManifest::default();
    for (id, record) in raw {
        match normalize_item(&id, record) {
            Ok(item) => out.items.push(item),
            Err(reason) => {
                tracing::warn!(item = %id, %reason, "skipping manifest record");
                out.skipped.push((ItemId::from(id), reason));
            }
        }
    }
    out
}

fn parse_enum<T: FromStr>(field: &str, value: &str) -> Result<T, String> {
    let normalized = value.trim().replace([' ', '-'], "_");
    T::from_str(&normalized).map_err(|_| format!("unknown {field} `{value}`"))
}

fn parse_opt<T: FromStr>(field: &str, value: Option<&str>) -> Result<Option<T>, String> {
    value.map(|v| parse_enum(field, v)).transpose()
}

fn parse_rarity(raw: Option<&RawRarity>) -> Result<Rarity, String> {
    match raw {
        None => Ok(Rarity::Common),
        Some(RawRarity::Name(name)) => parse_enum("rarity", name),
        Some(RawRarity::Rank(rank)) => match rank {
            0 => Ok(Rarity::Common),
            1 => Ok(Rarity::Uncommon),
            2 => Ok(Rarity::Rare),
            3 => Ok(Rarity::Legendary),
            4 => Ok(Rarity::Exotic),
            other => Err(format!("rarity rank {other} out of range")),
        },
    }
}

/// Resolve a stat key that is either a channel name or a manifest hash.
fn parse_stat_key(key: &str) -> Option<StatChannel> {
    match key.parse::<u32>() {
        Ok(hash) => StatChannel::from_manifest_hash(hash),
        Err(_) => StatChannel::from_str(key.trim()).ok(),
    }
}

fn normalize_item(id: &str, raw: RawItem) -> Result<ItemDefinition, String> {
    let kind: ItemKind = parse_enum("kind", &raw.kind)?;
    let slot: Option<Slot> = parse_opt("slot", raw.slot.as_deref())?;
    let rarity = parse_rarity(raw.rarity.as_ref())?;
    let class_affinity: ClassAffinity =
        parse_opt("class", raw.class_affinity.as_deref())?.unwrap_or_default();
    let damage_element: DamageElement =
        parse_opt("element", raw.damage_element.as_deref())?.unwrap_or_default();
    let weapon_type: Option<WeaponType> = parse_opt("weapon type", raw.weapon_type.as_deref())?;
    let subclass_role: Option<SubclassRole> = match raw.subclass_role.as_deref() {
        None => None,
        Some(role) => Some(match role.trim().to_lowercase().as_str() {
            "super" => SubclassRole::Super,
            "aspect" => SubclassRole::Aspect,
            "fragment" => SubclassRole::Fragment,
            "ability" | "grenade" | "melee" | "class_ability" => SubclassRole::Ability,
            other => return Err(format!("unknown subclass role `{other}`")),
        }),
    };

    if matches!(kind, ItemKind::Weapon | ItemKind::Armor) && slot.is_none() {
        return Err(format!("{kind} without a slot"));
    }

    let mut stat_contributions = BTreeMap::new();
    for (key, amount) in &raw.stats {
        match parse_stat_key(key) {
            Some(channel) => *stat_contributions.entry(channel).or_insert(0) += amount,
            None => tracing::debug!(item = %id, stat = %key, "ignoring non-armor stat"),
        }
    }

    let quality = match (raw.tuned_stat.as_deref(), raw.masterworked) {
        (Some(tuned), _) => PieceQuality::Tuned(parse_enum("tuned stat", tuned)?),
        (None, true) => PieceQuality::Masterworked,
        (None, false) => PieceQuality::Standard,
    };

    Ok(ItemDefinition {
        id: ItemId::new(id),
        name: raw.name,
        description: raw.description,
        kind,
        slot,
        rarity,
        class_affinity,
        damage_element,
        stat_contributions,
        weapon_type,
        subclass_role,
        quality,
    })
}
