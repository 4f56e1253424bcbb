//! Aggregated stat results.
//!
//! Contains `StatTotals`, the six clamped channel values carried by a build,
//! and `ResolvedStats`, which adds the per-channel breakdown of every source
//! that contributed to them.

use super::channel::StatChannel;
use super::MAX_STAT_VALUE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Six stat channel values, each clamped to `[0, MAX_STAT_VALUE]`.
///
/// # Examples
///
/// ```rust
/// use buildsmith::{StatChannel, StatTotals};
///
/// let mut totals = StatTotals::default();
/// totals.set(StatChannel::Recovery, 250);
/// assert_eq!(totals.get(StatChannel::Recovery), 200);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTotals {
    pub mobility: u32,
    pub resilience: u32,
    pub recovery: u32,
    pub discipline: u32,
    pub intellect: u32,
    pub strength: u32,
}

impl StatTotals {
    /// Value of one channel.
    pub fn get(&self, channel: StatChannel) -> u32 {
        match channel {
            StatChannel::Mobility => self.mobility,
            StatChannel::Resilience => self.resilience,
            StatChannel::Recovery => self.recovery,
            StatChannel::Discipline => self.discipline,
            StatChannel::Intellect => self.intellect,
            StatChannel::Strength => self.strength,
        }
    }

    /// Set one channel, clamping to the scale maximum.
    pub fn set(&mut self, channel: StatChannel, value: u32) {
        let value = value.min(MAX_STAT_VALUE);
        match channel {
            StatChannel::Mobility => self.mobility = value,
            StatChannel::Resilience => self.resilience = value,
            StatChannel::Recovery => self.recovery = value,
            StatChannel::Discipline => self.discipline = value,
            StatChannel::Intellect => self.intellect = value,
            StatChannel::Strength => self.strength = value,
        }
    }

    /// Iterate `(channel, value)` pairs in channel order.
    pub fn iter(&self) -> impl Iterator<Item = (StatChannel, u32)> + '_ {
        StatChannel::ALL.iter().map(move |&ch| (ch, self.get(ch)))
    }

    /// Sum over all six channels.
    pub fn total(&self) -> u32 {
        self.iter().map(|(_, v)| v).sum()
    }
}

/// A single contribution to a channel, kept for explanation output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatContribution {
    /// Human-readable description of the source (item name, bonus kind).
    pub source: String,
    /// Signed amount contributed before clamping.
    pub amount: i32,
}

/// Aggregated stats with a full breakdown.
///
/// Read-only and serializable. `overflow` records, per channel, the points
/// lost to the `[0, 200]` clamp so callers can flag wasted investment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStats {
    /// Final clamped values.
    pub totals: StatTotals,

    /// Contributions per channel, in the order they were registered.
    pub breakdown: BTreeMap<StatChannel, Vec<StatContribution>>,

    /// Points above the maximum that were discarded, per channel.
    pub overflow: BTreeMap<StatChannel, u32>,
}

impl ResolvedStats {
    /// Add a contribution to the breakdown of `channel`.
    pub fn add_contribution(
        &mut self,
        channel: StatChannel,
        source: impl Into<String>,
        amount: i32,
    ) {
        self.breakdown
            .entry(channel)
            .or_default()
            .push(StatContribution {
                source: source.into(),
                amount,
            });
    }

    /// Wasted points for one channel (zero when nothing overflowed).
    pub fn overflow_of(&self, channel: StatChannel) -> u32 {
        self.overflow.get(&channel).copied().unwrap_or(0)
    }
}
