//! Canonical item definition and its enumerations.

use crate::item_id::ItemId;
use crate::stats::StatChannel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Broad category of a catalog item.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemKind {
    Weapon,
    Armor,
    Mod,
    SubclassComponent,
    Consumable,
}

/// Equipment slot, for weapons and armor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Slot {
    Kinetic,
    Energy,
    Power,
    Helmet,
    Arms,
    Chest,
    Legs,
    ClassItem,
}

/// Slot group sharing the one-exotic limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotGroup {
    Weapon,
    Armor,
}

impl Slot {
    /// Weapon slots in assembly order.
    pub const WEAPONS: [Slot; 3] = [Slot::Kinetic, Slot::Energy, Slot::Power];

    /// Armor slots in assembly order.
    pub const ARMOR: [Slot; 5] = [
        Slot::Helmet,
        Slot::Arms,
        Slot::Chest,
        Slot::Legs,
        Slot::ClassItem,
    ];

    pub fn group(self) -> SlotGroup {
        match self {
            Slot::Kinetic | Slot::Energy | Slot::Power => SlotGroup::Weapon,
            _ => SlotGroup::Armor,
        }
    }
}

/// Ordinal quality rank; `Exotic` is the highest.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
    Exotic,
}

impl Rarity {
    /// Ordinal rank, 0 for common through 4 for exotic.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Character class an item is restricted to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ClassAffinity {
    #[default]
    Any,
    Titan,
    Hunter,
    Warlock,
}

impl ClassAffinity {
    /// Whether an item with this affinity can be used by `target`.
    ///
    /// `Any` on either side matches everything.
    pub fn accepts(self, target: ClassAffinity) -> bool {
        self == ClassAffinity::Any || target == ClassAffinity::Any || self == target
    }
}

/// Damage element of a weapon or subclass.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageElement {
    Kinetic,
    Solar,
    Arc,
    Void,
    Stasis,
    Strand,
    /// No damage element (most armor, consumables).
    #[default]
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    Untyped,
}

impl DamageElement {
    /// Elements a subclass can be built around.
    pub const SUBCLASS: [DamageElement; 5] = [
        DamageElement::Solar,
        DamageElement::Arc,
        DamageElement::Void,
        DamageElement::Stasis,
        DamageElement::Strand,
    ];

    /// Whether this is one of the "light/darkness" subclass elements.
    pub fn is_subclass_element(self) -> bool {
        Self::SUBCLASS.contains(&self)
    }
}

/// Weapon archetype.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WeaponType {
    AutoRifle,
    ScoutRifle,
    PulseRifle,
    HandCannon,
    Sidearm,
    SubmachineGun,
    Bow,
    Shotgun,
    SniperRifle,
    FusionRifle,
    LinearFusionRifle,
    TraceRifle,
    GrenadeLauncher,
    RocketLauncher,
    MachineGun,
    Sword,
    Glaive,
}

/// Role of a subclass component inside a subclass configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubclassRole {
    Super,
    Aspect,
    Fragment,
    Ability,
}

/// Upgrade level of an armor piece.
///
/// Top-tier pieces earn a flat stat bonus during aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceQuality {
    #[default]
    Standard,
    /// +2 to every channel.
    Masterworked,
    /// Perfect-tier piece: +5 to the tuned channel.
    Tuned(StatChannel),
}

impl PieceQuality {
    pub fn is_top_tier(self) -> bool {
        !matches!(self, PieceQuality::Standard)
    }
}

/// Immutable catalog record.
///
/// Built once at the catalog boundary; everything downstream reads it
/// through shared references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub slot: Option<Slot>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub class_affinity: ClassAffinity,
    #[serde(default)]
    pub damage_element: DamageElement,
    #[serde(default)]
    pub stat_contributions: BTreeMap<StatChannel, i32>,
    #[serde(default)]
    pub weapon_type: Option<WeaponType>,
    #[serde(default)]
    pub subclass_role: Option<SubclassRole>,
    #[serde(default)]
    pub quality: PieceQuality,
}

impl ItemDefinition {
    /// Create a common, class-agnostic item with no stats.
    pub fn new(id: &str, name: &str, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.to_string(),
            description: String::new(),
            kind,
            slot: None,
            rarity: Rarity::Common,
            class_affinity: ClassAffinity::Any,
            damage_element: DamageElement::Untyped,
            stat_contributions: BTreeMap::new(),
            weapon_type: None,
            subclass_role: None,
            quality: PieceQuality::Standard,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_class(mut self, class: ClassAffinity) -> Self {
        self.class_affinity = class;
        self
    }

    pub fn with_element(mut self, element: DamageElement) -> Self {
        self.damage_element = element;
        self
    }

    pub fn with_stat(mut self, channel: StatChannel, amount: i32) -> Self {
        self.stat_contributions.insert(channel, amount);
        self
    }

    pub fn with_weapon_type(mut self, weapon_type: WeaponType) -> Self {
        self.weapon_type = Some(weapon_type);
        self
    }

    pub fn with_role(mut self, role: SubclassRole) -> Self {
        self.subclass_role = Some(role);
        self
    }

    pub fn with_quality(mut self, quality: PieceQuality) -> Self {
        self.quality = quality;
        self
    }

    /// Derived from rarity.
    pub fn is_exotic(&self) -> bool {
        self.rarity == Rarity::Exotic
    }

    /// Sum of all stat contributions, before quality bonuses.
    pub fn stat_total(&self) -> i32 {
        self.stat_contributions.values().sum()
    }

    /// Lower-cased name and description, the text mined for keywords.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.name, self.description).to_lowercase()
    }
}
