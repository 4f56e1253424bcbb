//! Build records produced by the assembler.
//!
//! Everything here is plain serializable data. Maps are `BTreeMap` and
//! lists keep assembly order, so serializing the same build twice gives
//! byte-identical JSON.

use crate::catalog::{CatalogIndex, DamageElement, ItemDefinition, Slot, SlotGroup, SubclassRole};
use crate::intent::Activity;
use crate::item_id::ItemId;
use crate::mods::ModPick;
use crate::rules::Strength;
use crate::stats::{StatChannel, StatContribution, StatTotals};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scored candidate for a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub item_id: ItemId,
    pub item_name: String,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// What went into one slot, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub slot: Slot,
    /// `None` when no candidate was available.
    pub chosen: Option<CandidateScore>,
    pub reasoning: String,
    #[serde(default)]
    pub locked: bool,
    /// Next-best candidates, kept when alternatives are requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runner_ups: Vec<CandidateScore>,
}

impl SlotAssignment {
    pub fn chosen_id(&self) -> Option<&ItemId> {
        self.chosen.as_ref().map(|c| &c.item_id)
    }
}

/// A chosen subclass component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubclassPick {
    pub item_id: ItemId,
    pub name: String,
    pub role: SubclassRole,
}

/// Subclass element and its components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubclassConfig {
    /// `None` when the catalog holds no components for the class.
    pub element: Option<DamageElement>,
    pub components: Vec<SubclassPick>,
}

/// Category of a synergy or conflict.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SynergyKind {
    Stat,
    Element,
    Activity,
    /// A matched synergy pattern from the rule tables.
    Pattern,
    TriggerChain,
}

/// A detected interaction between parts of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synergy {
    pub id: String,
    pub kind: SynergyKind,
    pub strength: Strength,
    pub description: String,
    pub involved_ids: Vec<String>,
}

/// Conflicts share the synergy record shape.
pub type Conflict = Synergy;

/// Non-fatal problems found while assembling a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    NoCandidateFound { slot: Slot },
    InfeasibleConstraint {
        channel: StatChannel,
        required: u32,
        achievable: u32,
    },
    LockedItemRejected { item_id: ItemId, reason: String },
    UnknownLockedItem { item_id: ItemId },
    LowConfidence { confidence: f64 },
}

/// An assembled build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    /// Name of the archetype the armor was chosen for.
    pub archetype: String,
    pub activity: Activity,
    pub subclass: SubclassConfig,
    /// Kinetic, energy and power, in that order.
    pub weapons: Vec<SlotAssignment>,
    /// Helmet through class item, in that order.
    pub armor: Vec<SlotAssignment>,
    pub mods: Vec<ModPick>,
    pub stats: StatTotals,
    pub stat_breakdown: BTreeMap<StatChannel, Vec<StatContribution>>,
    /// Points lost to the channel cap.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stat_overflow: BTreeMap<StatChannel, u32>,
    pub synergies: Vec<Synergy>,
    pub conflicts: Vec<Conflict>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Build {
    /// Weapon and armor assignments, weapons first.
    pub fn assignments(&self) -> impl Iterator<Item = &SlotAssignment> {
        self.weapons.iter().chain(self.armor.iter())
    }

    pub fn assignment(&self, slot: Slot) -> Option<&SlotAssignment> {
        self.assignments().find(|a| a.slot == slot)
    }

    /// Item chosen for `slot`, if any.
    pub fn chosen(&self, slot: Slot) -> Option<&ItemId> {
        self.assignment(slot).and_then(SlotAssignment::chosen_id)
    }

    /// Equipped weapons and armor, resolved against the catalog.
    pub fn equipped<'a>(&self, catalog: &'a CatalogIndex) -> Vec<&'a ItemDefinition> {
        self.assignments()
            .filter_map(SlotAssignment::chosen_id)
            .filter_map(|id| catalog.get(id))
            .collect()
    }

    /// Number of exotics equipped in a slot group.
    pub fn exotic_count(&self, group: SlotGroup, catalog: &CatalogIndex) -> usize {
        self.equipped(catalog)
            .into_iter()
            .filter(|item| item.is_exotic() && item.slot.map(Slot::group) == Some(group))
            .count()
    }
}
