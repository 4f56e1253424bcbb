//! Rule table records.
//!
//! Everything here is plain data deserialized from RON. Ids are strings
//! unique within their table; cross-table references are checked when a
//! [`RuleBase`](super::RuleBase) is built.

use super::stacking::StackingMode;
use crate::catalog::DamageElement;
use crate::intent::{Activity, Playstyle};
use serde::{Deserialize, Serialize};

/// How dependably a trigger fires during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    Low,
    Medium,
    High,
}

/// How often a trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Rare,
    Occasional,
    Frequent,
    Constant,
}

/// Size of an effect's impact on play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Minor,
    Moderate,
    Major,
}

/// Strength of a synergy, pattern or conflict.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Strength {
    Low,
    Medium,
    High,
}

impl Strength {
    /// Points a synergy of this strength adds to the synergy axis.
    pub fn points(self) -> f64 {
        match self {
            Strength::High => 25.0,
            Strength::Medium => 15.0,
            Strength::Low => 8.0,
        }
    }
}

/// Whether a pattern keeps itself going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sustainability {
    Burst,
    Sustained,
    SelfSustaining,
}

/// An in-game event that can set off effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    pub name: String,
    pub reliability: Reliability,
    pub frequency: Frequency,
    /// Activities where the trigger fires naturally; empty means anywhere.
    #[serde(default)]
    pub contexts: Vec<Activity>,
    /// Lower-case phrases that reveal the trigger in item text.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A buff or debuff granted by a trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: String,
    pub name: String,
    pub impact: Impact,
    pub stacking: StackingMode,
    /// Percent.
    pub magnitude: f64,
    #[serde(default)]
    pub duration_secs: f64,
    /// Triggers this effect tends to cause.
    #[serde(default)]
    pub feeds: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A known combination of triggers and effects that work together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyPattern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub triggers: Vec<String>,
    pub effects: Vec<String>,
    pub strength: Strength,
    pub sustainability: Sustainability,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// How a conflict between two active ids is settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Keep the side with the larger magnitude.
    HighestMagnitude,
    /// Keep the side with the longer duration.
    LongestDuration,
    /// Keep whichever side appears first in the list.
    PriorityOrder(Vec<String>),
    /// Keep both sides while their combined magnitude stays under the cap.
    AdditiveCap(f64),
}

/// Two triggers or effects that cannot both apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRule {
    pub id: String,
    pub left: String,
    pub right: String,
    pub resolution: Resolution,
}

/// Triggers and effects implied by building around an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementAffinity {
    pub element: DamageElement,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub effects: Vec<String>,
    /// Playstyles this element rewards when a subclass is chosen.
    #[serde(default)]
    pub playstyles: Vec<Playstyle>,
}

/// The raw, versioned rule tables as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTables {
    pub version: u32,
    pub triggers: Vec<Trigger>,
    pub effects: Vec<Effect>,
    pub patterns: Vec<SynergyPattern>,
    #[serde(default)]
    pub conflicts: Vec<ConflictRule>,
    #[serde(default)]
    pub affinities: Vec<ElementAffinity>,
}
