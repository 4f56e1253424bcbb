//! Stat aggregation module.
//!
//! Provides the `StatAggregator` type, which collects sources for a set of
//! equipped items and resolves them into clamped channel totals with a
//! breakdown.

use super::channel::StatChannel;
use super::source::{QualityBonus, StatSource};
use super::totals::{ResolvedStats, StatTotals};
use super::MAX_STAT_VALUE;
use crate::catalog::ItemDefinition;

/// Collects stat sources and resolves them into totals.
///
/// Resolution is a pure fold:
/// 1. For each channel, sum every source's contribution (in registration order)
/// 2. Record each non-zero contribution in the breakdown
/// 3. Clamp the sum to `[0, MAX_STAT_VALUE]`, recording overflow
///
/// # Examples
///
/// ```rust
/// use buildsmith::stats::StatAggregator;
/// use buildsmith::catalog::PieceQuality;
/// use buildsmith::{ItemDefinition, ItemKind, StatChannel};
///
/// let helm = ItemDefinition::new("helm", "Helm", ItemKind::Armor)
///     .with_stat(StatChannel::Recovery, 20)
///     .with_quality(PieceQuality::Masterworked);
/// let arms = ItemDefinition::new("arms", "Arms", ItemKind::Armor)
///     .with_stat(StatChannel::Recovery, 18);
///
/// let mut aggregator = StatAggregator::new();
/// aggregator.register_item(&helm);
/// aggregator.register_item(&arms);
///
/// let resolved = aggregator.resolve();
/// assert_eq!(resolved.totals.get(StatChannel::Recovery), 40); // 20 + 2 + 18
/// assert_eq!(resolved.totals.get(StatChannel::Mobility), 2);  // masterwork only
/// ```
#[derive(Default)]
pub struct StatAggregator<'a> {
    sources: Vec<Box<dyn StatSource + 'a>>,
}

impl<'a> StatAggregator<'a> {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Register an arbitrary source.
    pub fn register_source(&mut self, source: Box<dyn StatSource + 'a>) {
        self.sources.push(source);
    }

    /// Register an item and, when it is top-tier, its quality bonus.
    pub fn register_item(&mut self, item: &'a ItemDefinition) {
        self.sources.push(Box::new(item));
        let bonus = QualityBonus::of(item);
        if bonus.is_active() {
            self.sources.push(Box::new(bonus));
        }
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no source has been registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Resolve every channel.
    pub fn resolve(&self) -> ResolvedStats {
        let mut resolved = ResolvedStats::default();

        for channel in StatChannel::ALL {
            let mut sum: i64 = 0;
            for source in &self.sources {
                let amount = source.contribution(channel);
                if amount != 0 {
                    sum += i64::from(amount);
                    resolved.add_contribution(channel, source.label(), amount);
                }
            }

            let max = i64::from(MAX_STAT_VALUE);
            if sum > max {
                resolved.overflow.insert(channel, (sum - max) as u32);
            }
            resolved.totals.set(channel, sum.clamp(0, max) as u32);
        }

        resolved
    }
}

/// Sum the contributions of `items` into clamped totals.
///
/// Masterworked pieces add +2 per channel and tuned pieces add +5 to their
/// tuned channel, exactly as [`StatAggregator::register_item`] does.
pub fn aggregate(items: &[&ItemDefinition]) -> StatTotals {
    aggregate_resolved(items).totals
}

/// Like [`aggregate`] but keeps the breakdown and overflow.
pub fn aggregate_resolved(items: &[&ItemDefinition]) -> ResolvedStats {
    let mut aggregator = StatAggregator::new();
    for &item in items {
        aggregator.register_item(item);
    }
    aggregator.resolve()
}
