//! The six stat channels.

use serde::{Deserialize, Serialize};

/// One of the six armor stat channels.
///
/// Declaration order is the canonical display order and is used whenever
/// channels are iterated.
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
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatChannel {
    Mobility,
    Resilience,
    Recovery,
    Discipline,
    Intellect,
    Strength,
}

impl StatChannel {
    /// All channels in declaration order.
    pub const ALL: [StatChannel; 6] = [
        StatChannel::Mobility,
        StatChannel::Resilience,
        StatChannel::Recovery,
        StatChannel::Discipline,
        StatChannel::Intellect,
        StatChannel::Strength,
    ];

    /// Position of this channel in [`StatChannel::ALL`].
    pub fn index(self) -> usize {
        match self {
            StatChannel::Mobility => 0,
            StatChannel::Resilience => 1,
            StatChannel::Recovery => 2,
            StatChannel::Discipline => 3,
            StatChannel::Intellect => 4,
            StatChannel::Strength => 5,
        }
    }

    /// Map a manifest stat hash to its channel.
    ///
    /// Some manifest exports key investment stats by numeric hash instead of
    /// by name; this is the table used to normalize them.
    pub fn from_manifest_hash(hash: u32) -> Option<StatChannel> {
        match hash {
            2_996_146_975 => Some(StatChannel::Mobility),
            392_767_087 => Some(StatChannel::Resilience),
            1_943_323_491 => Some(StatChannel::Recovery),
            1_735_777_505 => Some(StatChannel::Discipline),
            144_602_215 => Some(StatChannel::Intellect),
            4_244_567_218 => Some(StatChannel::Strength),
            _ => None,
        }
    }

    /// Ability the channel drives, used in recommendation text.
    pub fn governs(self) -> &'static str {
        match self {
            StatChannel::Mobility => "movement speed and jump",
            StatChannel::Resilience => "damage resistance and shields",
            StatChannel::Recovery => "health regeneration",
            StatChannel::Discipline => "grenade cooldown",
            StatChannel::Intellect => "super cooldown",
            StatChannel::Strength => "melee cooldown",
        }
    }
}
