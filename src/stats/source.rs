//! Stat sources module.
//!
//! Sources produce the raw per-channel amounts that the aggregator sums.
//! Every equipped item is a source, and so is the flat bonus a top-tier
//! piece receives from its quality.

use super::channel::StatChannel;
use crate::catalog::{ItemDefinition, PieceQuality};

/// Flat bonus added to every channel by a masterworked piece.
pub const MASTERWORK_BONUS: i32 = 2;

/// Bonus added to the tuned channel of a perfect-tier piece.
pub const TUNING_BONUS: i32 = 5;

/// Trait for anything that contributes to stat channels.
///
/// Sources are stateless and deterministic: the same source always
/// reports the same contribution. Multiple sources for the same channel
/// are summed.
///
/// # Examples
///
/// ```rust
/// use buildsmith::stats::StatSource;
/// use buildsmith::{ItemDefinition, ItemKind, StatChannel};
///
/// let helmet = ItemDefinition::new("helm", "Helm", ItemKind::Armor)
///     .with_stat(StatChannel::Recovery, 20);
///
/// assert_eq!(helmet.contribution(StatChannel::Recovery), 20);
/// assert_eq!(helmet.contribution(StatChannel::Mobility), 0);
/// ```
pub trait StatSource {
    /// Label shown in the stat breakdown.
    fn label(&self) -> String;

    /// Amount this source adds to `channel` (may be negative).
    fn contribution(&self, channel: StatChannel) -> i32;
}

impl<T: StatSource + ?Sized> StatSource for &T {
    fn label(&self) -> String {
        (**self).label()
    }

    fn contribution(&self, channel: StatChannel) -> i32 {
        (**self).contribution(channel)
    }
}

impl StatSource for ItemDefinition {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn contribution(&self, channel: StatChannel) -> i32 {
        self.stat_contributions.get(&channel).copied().unwrap_or(0)
    }
}

/// The quality bonus carried by a single piece.
///
/// Masterworked pieces add [`MASTERWORK_BONUS`] to every channel; tuned
/// pieces add [`TUNING_BONUS`] to their tuned channel only. Standard pieces
/// contribute nothing.
#[derive(Debug, Clone, Copy)]
pub struct QualityBonus<'a> {
    item: &'a ItemDefinition,
}

impl<'a> QualityBonus<'a> {
    /// Wrap an item's quality as a source.
    pub fn of(item: &'a ItemDefinition) -> Self {
        Self { item }
    }

    /// Whether this bonus contributes anything at all.
    pub fn is_active(&self) -> bool {
        !matches!(self.item.quality, PieceQuality::Standard)
    }
}

impl StatSource for QualityBonus<'_> {
    fn label(&self) -> String {
        match self.item.quality {
            PieceQuality::Standard => format!("{} (standard)", self.item.name),
            PieceQuality::Masterworked => format!("{} (masterwork)", self.item.name),
            PieceQuality::Tuned(ch) => format!("{} (tuned {})", self.item.name, ch),
        }
    }

    fn contribution(&self, channel: StatChannel) -> i32 {
        match self.item.quality {
            PieceQuality::Standard => 0,
            PieceQuality::Masterworked => MASTERWORK_BONUS,
            PieceQuality::Tuned(tuned) if tuned == channel => TUNING_BONUS,
            PieceQuality::Tuned(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemKind;

    #[test]
    fn test_item_source() {
        let chest = ItemDefinition::new("chest", "Chest", ItemKind::Armor)
            .with_stat(StatChannel::Resilience, 24)
            .with_stat(StatChannel::Strength, -5);

        assert_eq!(chest.contribution(StatChannel::Resilience), 24);
        assert_eq!(chest.contribution(StatChannel::Strength), -5);
        assert_eq!(chest.contribution(StatChannel::Intellect), 0);
        assert_eq!(chest.label(), "Chest");
    }

    #[test]
    fn test_masterwork_bonus_applies_to_every_channel() {
        let legs = ItemDefinition::new("legs", "Legs", ItemKind::Armor)
            .with_quality(PieceQuality::Masterworked);
        let bonus = QualityBonus::of(&legs);

        assert!(bonus.is_active());
        for ch in StatChannel::ALL {
            assert_eq!(bonus.contribution(ch), MASTERWORK_BONUS);
        }
        assert!(bonus.label().contains("masterwork"));
    }

    #[test]
    fn test_tuned_bonus_only_on_tuned_channel() {
        let arms = ItemDefinition::new("arms", "Arms", ItemKind::Armor)
            .with_quality(PieceQuality::Tuned(StatChannel::Discipline));
        let bonus = QualityBonus::of(&arms);

        assert_eq!(bonus.contribution(StatChannel::Discipline), TUNING_BONUS);
        assert_eq!(bonus.contribution(StatChannel::Recovery), 0);
    }

    #[test]
    fn test_standard_piece_has_no_bonus() {
        let helm = ItemDefinition::new("helm", "Helm", ItemKind::Armor);
        let bonus = QualityBonus::of(&helm);
        assert!(!bonus.is_active());
        assert_eq!(bonus.contribution(StatChannel::Mobility), 0);
    }
}
