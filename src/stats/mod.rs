//! Stat model: channels, aggregation and tier math.
//!
//! The crate works on the expanded 0–200 scale everywhere: channel totals
//! clamp to [`MAX_STAT_VALUE`], tiers cap at [`MAX_TIER`] and secondary
//! effects unlock at [`SECONDARY_EFFECT_THRESHOLD`].

pub mod aggregate;
pub mod breakpoints;
pub mod channel;
pub mod source;
pub mod totals;

pub use aggregate::{aggregate, aggregate_resolved, StatAggregator};
pub use breakpoints::{efficiency, effects_at, tier, Breakpoint, StatEffects};
pub use channel::StatChannel;
pub use source::{QualityBonus, StatSource, MASTERWORK_BONUS, TUNING_BONUS};
pub use totals::{ResolvedStats, StatContribution, StatTotals};

/// Highest value a channel total can hold.
pub const MAX_STAT_VALUE: u32 = 200;

/// Highest tier on the 0–200 scale.
pub const MAX_TIER: u32 = 20;

/// Value at which a channel's secondary effect unlocks.
pub const SECONDARY_EFFECT_THRESHOLD: u32 = 100;
