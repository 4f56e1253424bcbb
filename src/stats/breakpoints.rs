//! Tier and breakpoint math on the 0–200 scale.
//!
//! A channel's tier is `floor(value / 10)`, capped at [`MAX_TIER`]. Each
//! channel has a static breakpoint table; the effect in force is the entry
//! with the highest tier not above the current tier. Secondary effects
//! unlock at [`SECONDARY_EFFECT_THRESHOLD`] regardless of the table.

use super::channel::StatChannel;
use super::{MAX_STAT_VALUE, MAX_TIER, SECONDARY_EFFECT_THRESHOLD};
use serde::{Deserialize, Serialize};

/// A breakpoint in a channel's tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    pub tier: u32,
    pub effect: &'static str,
}

const MOBILITY: &[Breakpoint] = &[
    Breakpoint { tier: 0, effect: "Base movement speed" },
    Breakpoint { tier: 3, effect: "Slightly faster strafe and sprint" },
    Breakpoint { tier: 5, effect: "Noticeably faster movement and jump height" },
    Breakpoint { tier: 7, effect: "Fast class ability recharge for evasive classes" },
    Breakpoint { tier: 10, effect: "Maximum base movement speed" },
    Breakpoint { tier: 15, effect: "Improved airborne weapon handling" },
    Breakpoint { tier: 20, effect: "Peak airborne effectiveness" },
];

const RESILIENCE: &[Breakpoint] = &[
    Breakpoint { tier: 0, effect: "Base shield capacity" },
    Breakpoint { tier: 3, effect: "Minor combatant damage resistance" },
    Breakpoint { tier: 5, effect: "Moderate combatant damage resistance" },
    Breakpoint { tier: 7, effect: "Reduced flinch while taking damage" },
    Breakpoint { tier: 10, effect: "Maximum base damage resistance" },
    Breakpoint { tier: 15, effect: "Extra shield capacity in high-tier content" },
    Breakpoint { tier: 20, effect: "Peak survivability against combatants" },
];

const RECOVERY: &[Breakpoint] = &[
    Breakpoint { tier: 0, effect: "Base health regeneration delay" },
    Breakpoint { tier: 3, effect: "Slightly shorter regeneration delay" },
    Breakpoint { tier: 5, effect: "Faster health regeneration" },
    Breakpoint { tier: 7, effect: "Regeneration outpaces chip damage" },
    Breakpoint { tier: 10, effect: "Maximum base regeneration speed" },
    Breakpoint { tier: 15, effect: "Healing received is amplified" },
    Breakpoint { tier: 20, effect: "Peak sustain between engagements" },
];

const DISCIPLINE: &[Breakpoint] = &[
    Breakpoint { tier: 0, effect: "Base grenade cooldown" },
    Breakpoint { tier: 3, effect: "Grenade cooldown reduced by roughly a fifth" },
    Breakpoint { tier: 5, effect: "Grenade cooldown reduced by roughly a third" },
    Breakpoint { tier: 7, effect: "Grenade available every major encounter wave" },
    Breakpoint { tier: 10, effect: "Maximum base grenade regeneration" },
    Breakpoint { tier: 15, effect: "Grenade kills refund additional energy" },
    Breakpoint { tier: 20, effect: "Near-constant grenade uptime" },
];

const INTELLECT: &[Breakpoint] = &[
    Breakpoint { tier: 0, effect: "Base super cooldown" },
    Breakpoint { tier: 3, effect: "Super cooldown reduced by roughly a fifth" },
    Breakpoint { tier: 5, effect: "Super cooldown reduced by roughly a third" },
    Breakpoint { tier: 7, effect: "Super available twice per long encounter" },
    Breakpoint { tier: 10, effect: "Maximum base super regeneration" },
    Breakpoint { tier: 15, effect: "Super damage phase uptime improved" },
    Breakpoint { tier: 20, effect: "Peak super uptime" },
];

const STRENGTH: &[Breakpoint] = &[
    Breakpoint { tier: 0, effect: "Base melee cooldown" },
    Breakpoint { tier: 3, effect: "Melee cooldown reduced by roughly a fifth" },
    Breakpoint { tier: 5, effect: "Melee cooldown reduced by roughly a third" },
    Breakpoint { tier: 7, effect: "Melee available every engagement" },
    Breakpoint { tier: 10, effect: "Maximum base melee regeneration" },
    Breakpoint { tier: 15, effect: "Melee kills refund additional energy" },
    Breakpoint { tier: 20, effect: "Near-constant melee uptime" },
];

/// Breakpoint table for a channel, ordered by ascending tier.
pub fn breakpoints(channel: StatChannel) -> &'static [Breakpoint] {
    match channel {
        StatChannel::Mobility => MOBILITY,
        StatChannel::Resilience => RESILIENCE,
        StatChannel::Recovery => RECOVERY,
        StatChannel::Discipline => DISCIPLINE,
        StatChannel::Intellect => INTELLECT,
        StatChannel::Strength => STRENGTH,
    }
}

/// Effect unlocked once a channel reaches [`SECONDARY_EFFECT_THRESHOLD`].
pub fn secondary_effect(channel: StatChannel) -> &'static str {
    match channel {
        StatChannel::Mobility => "Bonus weapon handling and reload while moving",
        StatChannel::Resilience => "Bonus damage resistance while shields are broken",
        StatChannel::Recovery => "Bonus healing from orbs and restoration effects",
        StatChannel::Discipline => "Bonus grenade damage",
        StatChannel::Intellect => "Bonus super damage",
        StatChannel::Strength => "Bonus melee damage",
    }
}

/// Tier for a stat value: `floor(value / 10)`, capped at [`MAX_TIER`].
pub fn tier(value: u32) -> u32 {
    (value / 10).min(MAX_TIER)
}

/// How cleanly a value lands on a tier boundary.
///
/// `1.0` when `value % 10 == 0`, otherwise `(10 - value % 10) / 10`, so the
/// points past the last boundary count against the score.
pub fn efficiency(value: u32) -> f64 {
    let rem = value % 10;
    if rem == 0 {
        1.0
    } else {
        f64::from(10 - rem) / 10.0
    }
}

/// Effects in force for a channel at a given value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEffects {
    pub channel: StatChannel,
    pub value: u32,
    pub tier: u32,
    /// Effect of the highest breakpoint at or below `tier`.
    pub unlocked_effect: String,
    /// Present once `value >= SECONDARY_EFFECT_THRESHOLD`.
    pub secondary_effect: Option<String>,
    /// Points needed to reach the next breakpoint, `None` at the top.
    pub next_breakpoint_gap: Option<u32>,
}

/// Look up the effects of `channel` at `value`.
///
/// # Examples
///
/// ```rust
/// use buildsmith::stats::effects_at;
/// use buildsmith::StatChannel;
///
/// let fx = effects_at(StatChannel::Discipline, 64);
/// assert_eq!(fx.tier, 6);
/// assert_eq!(fx.next_breakpoint_gap, Some(6)); // next breakpoint at tier 7
/// assert!(fx.secondary_effect.is_none());
/// ```
pub fn effects_at(channel: StatChannel, value: u32) -> StatEffects {
    let value = value.min(MAX_STAT_VALUE);
    let current_tier = tier(value);
    let table = breakpoints(channel);

    let unlocked = table
        .iter()
        .rev()
        .find(|bp| bp.tier <= current_tier)
        .map(|bp| bp.effect)
        .unwrap_or("No effect");

    let next_breakpoint_gap = table
        .iter()
        .find(|bp| bp.tier > current_tier)
        .map(|bp| bp.tier * 10 - value);

    let secondary_effect = (value >= SECONDARY_EFFECT_THRESHOLD)
        .then(|| secondary_effect(channel).to_string());

    StatEffects {
        channel,
        value,
        tier: current_tier,
        unlocked_effect: unlocked.to_string(),
        secondary_effect,
        next_breakpoint_gap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_floor_and_cap() {
        assert_eq!(tier(0), 0);
        assert_eq!(tier(9), 0);
        assert_eq!(tier(10), 1);
        assert_eq!(tier(199), 19);
        assert_eq!(tier(200), 20);
        assert_eq!(tier(350), MAX_TIER);
    }

    #[test]
    fn test_efficiency() {
        assert_eq!(efficiency(100), 1.0);
        assert_eq!(efficiency(0), 1.0);
        assert!((efficiency(101) - 0.9).abs() < 1e-9);
        assert!((efficiency(109) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_tables_are_sorted_and_start_at_zero() {
        for ch in StatChannel::ALL {
            let table = breakpoints(ch);
            assert_eq!(table[0].tier, 0);
            assert!(table.windows(2).all(|w| w[0].tier < w[1].tier));
            assert!(table.iter().all(|bp| bp.tier <= MAX_TIER));
        }
    }

    #[test]
    fn test_effects_at_midpoint_unlocks_secondary() {
        let below = effects_at(StatChannel::Recovery, 99);
        assert!(below.secondary_effect.is_none());

        let at = effects_at(StatChannel::Recovery, 100);
        assert!(at.secondary_effect.is_some());
        assert_eq!(at.tier, 10);
        assert_eq!(at.unlocked_effect, "Maximum base regeneration speed");
        assert_eq!(at.next_breakpoint_gap, Some(50));
    }

    #[test]
    fn test_effects_at_top_has_no_gap() {
        let top = effects_at(StatChannel::Strength, 200);
        assert_eq!(top.tier, 20);
        assert_eq!(top.next_breakpoint_gap, None);

        let over = effects_at(StatChannel::Strength, 260);
        assert_eq!(over.value, 200);
    }

    #[test]
    fn test_effects_at_between_breakpoints() {
        let fx = effects_at(StatChannel::Mobility, 42);
        assert_eq!(fx.tier, 4);
        assert_eq!(fx.unlocked_effect, "Slightly faster strafe and sprint");
        assert_eq!(fx.next_breakpoint_gap, Some(8));
    }
}
