//! Armor archetypes.
//!
//! An archetype is a stat-priority template: which channels matter most,
//! how much each is worth, and which activities and playstyles it suits.
//! The selector ranks archetypes against an intent and scores armor pieces
//! against the chosen one.

use crate::catalog::{CatalogIndex, ClassAffinity, ItemDefinition, ItemKind, Slot};
use crate::intent::{Activity, BuildIntent, Playstyle};
use crate::stats::{tier, StatChannel, MASTERWORK_BONUS, MAX_STAT_VALUE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat bonus a masterworked or tuned piece earns in [`score_piece`].
pub const TOP_TIER_PIECE_BONUS: f64 = 10.0;

/// Weight of a primary channel with no explicit weight.
const PRIMARY_WEIGHT: f64 = 1.0;
/// Weight of a secondary channel with no explicit weight.
const SECONDARY_WEIGHT: f64 = 0.5;
/// Weight of any other channel.
const OTHER_WEIGHT: f64 = 0.1;

/// A stat-priority template for armor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub primary: Vec<StatChannel>,
    #[serde(default)]
    pub secondary: Vec<StatChannel>,
    /// Explicit channel weights.
    #[serde(default)]
    pub weights: Vec<(StatChannel, f64)>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub playstyles: Vec<Playstyle>,
    #[serde(default)]
    pub min_primary_tier: u32,
    #[serde(default)]
    pub min_secondary_tier: u32,
}

impl Archetype {
    /// Weight of `channel`: the explicit weight, else a default by priority.
    pub fn weight(&self, channel: StatChannel) -> f64 {
        if let Some(&(_, w)) = self.weights.iter().find(|(ch, _)| *ch == channel) {
            return w;
        }
        if self.primary.contains(&channel) {
            PRIMARY_WEIGHT
        } else if self.secondary.contains(&channel) {
            SECONDARY_WEIGHT
        } else {
            OTHER_WEIGHT
        }
    }

    /// Primary channels followed by secondary ones.
    pub fn focus_channels(&self) -> Vec<StatChannel> {
        let mut channels = self.primary.clone();
        for ch in &self.secondary {
            if !channels.contains(ch) {
                channels.push(*ch);
            }
        }
        channels
    }

    /// Fit of the archetype for an intent.
    ///
    /// `25·activity + 20·playstyle + 15·primary overlap + 8·secondary overlap`.
    pub fn match_score(&self, intent: &BuildIntent) -> u32 {
        let activity = u32::from(self.activities.contains(&intent.activity));
        let playstyle = u32::from(self.playstyles.contains(&intent.playstyle));
        let overlap = |channels: &[StatChannel]| {
            channels
                .iter()
                .filter(|ch| intent.priority_stats.contains(*ch))
                .count() as u32
        };
        25 * activity + 20 * playstyle + 15 * overlap(&self.primary) + 8 * overlap(&self.secondary)
    }
}

/// Ranked archetypes for an intent.
#[derive(Debug, Clone)]
pub struct ArchetypeRecommendation<'a> {
    pub primary: &'a Archetype,
    pub alternatives: Vec<&'a Archetype>,
}

/// Rank `archetypes` for `intent`; ties keep declaration order.
///
/// Returns `None` only when the table is empty.
///
/// # Examples
///
/// ```rust
/// use buildsmith::archetype::{recommend, Archetype};
/// use buildsmith::intent::{Activity, BuildIntent};
/// use buildsmith::StatChannel;
///
/// let archetypes: Vec<Archetype> = ron::from_str(r#"[
///     (name: "Grenadier", primary: [discipline], activities: [raid]),
///     (name: "Sprinter", primary: [mobility], activities: [crucible]),
/// ]"#).unwrap();
///
/// let intent = BuildIntent {
///     activity: Activity::Crucible,
///     ..BuildIntent::default()
/// };
/// let rec = recommend(&archetypes, &intent, 1).unwrap();
/// assert_eq!(rec.primary.name, "Sprinter");
/// assert_eq!(rec.alternatives[0].name, "Grenadier");
/// ```
pub fn recommend<'a>(
    archetypes: &'a [Archetype],
    intent: &BuildIntent,
    alternative_count: usize,
) -> Option<ArchetypeRecommendation<'a>> {
    let mut ranked: Vec<(u32, &Archetype)> = archetypes
        .iter()
        .map(|a| (a.match_score(intent), a))
        .collect();
    // stable: equal scores keep declaration order
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    let mut iter = ranked.into_iter().map(|(_, a)| a);
    let primary = iter.next()?;
    tracing::debug!(archetype = %primary.name, "archetype selected");
    Some(ArchetypeRecommendation {
        primary,
        alternatives: iter.take(alternative_count).collect(),
    })
}

/// Score an armor piece against an archetype.
///
/// `Σ contribution[ch] · (numeric target[ch] or weight[ch])`, plus
/// [`TOP_TIER_PIECE_BONUS`] for masterworked or tuned pieces.
pub fn score_piece(piece: &ItemDefinition, intent: &BuildIntent, archetype: &Archetype) -> f64 {
    let stats: f64 = piece
        .stat_contributions
        .iter()
        .map(|(&ch, &amount)| f64::from(amount) * intent.weight_for(ch, archetype.weight(ch)))
        .sum();
    let bonus = if piece.quality.is_top_tier() {
        TOP_TIER_PIECE_BONUS
    } else {
        0.0
    };
    stats + bonus
}

/// How well a piece's stats line up with an archetype, 0–100.
///
/// The share of the piece's positive stat points that land on primary
/// channels (full credit) or secondary channels (half credit), plus the
/// top-tier bonus. Pieces without stats fit at 0.
pub fn piece_fit(piece: &ItemDefinition, archetype: &Archetype) -> f64 {
    let positive: i32 = piece
        .stat_contributions
        .values()
        .filter(|&&v| v > 0)
        .sum();
    if positive <= 0 {
        return 0.0;
    }
    let credited: f64 = piece
        .stat_contributions
        .iter()
        .filter(|(_, v)| **v > 0)
        .map(|(ch, &v)| {
            if archetype.primary.contains(ch) {
                f64::from(v)
            } else if archetype.secondary.contains(ch) {
                f64::from(v) * 0.5
            } else {
                0.0
            }
        })
        .sum();
    let bonus = if piece.quality.is_top_tier() {
        TOP_TIER_PIECE_BONUS
    } else {
        0.0
    };
    (credited / f64::from(positive) * 100.0 + bonus).min(100.0)
}

/// Largest stat totals the catalog can realistically reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityLimits {
    /// Most the five armor pieces together add to each channel.
    pub armor_max: BTreeMap<StatChannel, u32>,
    /// Whether masterwork bonuses can be counted on.
    pub masterwork_allowed: bool,
    pub extra_mod_slots: u32,
    /// Points one stat mod adds.
    pub per_mod_bonus: u32,
}

/// Per-piece stat ceiling assumed without a catalog.
pub const DEFAULT_PIECE_MAX: u32 = 30;

impl Default for FeasibilityLimits {
    fn default() -> Self {
        Self {
            armor_max: StatChannel::ALL
                .iter()
                .map(|&ch| (ch, DEFAULT_PIECE_MAX * Slot::ARMOR.len() as u32))
                .collect(),
            masterwork_allowed: true,
            extra_mod_slots: 5,
            per_mod_bonus: 10,
        }
    }
}

impl FeasibilityLimits {
    /// Derive limits from what the catalog actually offers `class`.
    pub fn from_catalog(catalog: &CatalogIndex, class: ClassAffinity, extra_mod_slots: u32) -> Self {
        let armor_max = StatChannel::ALL
            .iter()
            .map(|&ch| {
                let total: i32 = Slot::ARMOR
                    .iter()
                    .map(|&slot| catalog.max_contribution(slot, ch, class))
                    .sum();
                (ch, total.max(0) as u32)
            })
            .collect();

        let per_mod_bonus = catalog
            .by_kind(ItemKind::Mod)
            .filter(|m| m.class_affinity.accepts(class))
            .flat_map(|m| m.stat_contributions.values().copied())
            .max()
            .unwrap_or(0)
            .max(0) as u32;

        Self {
            armor_max,
            masterwork_allowed: catalog.has_top_tier_armor(),
            extra_mod_slots,
            per_mod_bonus,
        }
    }

    /// Highest value `channel` can reach, capped at the scale maximum.
    pub fn max_reachable(&self, channel: StatChannel) -> u32 {
        let armor = self.armor_max.get(&channel).copied().unwrap_or(0);
        let masterwork = if self.masterwork_allowed {
            MASTERWORK_BONUS.unsigned_abs() * Slot::ARMOR.len() as u32
        } else {
            0
        };
        let mods = self.extra_mod_slots * self.per_mod_bonus;
        (armor + masterwork + mods).min(MAX_STAT_VALUE)
    }
}

/// Whether an archetype's minimum tiers are reachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feasibility {
    pub feasible: bool,
    pub unmet_channels: Vec<StatChannel>,
}

/// Compare an archetype's minimum tiers against the reachable maximum.
pub fn feasibility(archetype: &Archetype, limits: &FeasibilityLimits) -> Feasibility {
    let mut unmet = Vec::new();
    let mut check = |channels: &[StatChannel], min_tier: u32| {
        for &ch in channels {
            if tier(limits.max_reachable(ch)) < min_tier && !unmet.contains(&ch) {
                unmet.push(ch);
            }
        }
    };
    check(&archetype.primary, archetype.min_primary_tier);
    check(&archetype.secondary, archetype.min_secondary_tier);

    Feasibility {
        feasible: unmet.is_empty(),
        unmet_channels: unmet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PieceQuality;

    fn archetype(name: &str, primary: &[StatChannel], secondary: &[StatChannel]) -> Archetype {
        Archetype {
            name: name.to_string(),
            description: String::new(),
            primary: primary.to_vec(),
            secondary: secondary.to_vec(),
            weights: Vec::new(),
            activities: Vec::new(),
            playstyles: Vec::new(),
            min_primary_tier: 0,
            min_secondary_tier: 0,
        }
    }

    #[test]
    fn test_match_score_formula() {
        let mut a = archetype(
            "a",
            &[StatChannel::Discipline, StatChannel::Recovery],
            &[StatChannel::Resilience],
        );
        a.activities = vec![Activity::Raid];
        a.playstyles = vec![Playstyle::Dps];

        let intent = BuildIntent {
            activity: Activity::Raid,
            playstyle: Playstyle::Dps,
            priority_stats: vec![StatChannel::Discipline, StatChannel::Resilience],
            ..BuildIntent::default()
        };
        assert_eq!(a.match_score(&intent), 25 + 20 + 15 + 8);
    }

    #[test]
    fn test_recommend_ties_keep_declaration_order() {
        let table = vec![
            archetype("first", &[StatChannel::Mobility], &[]),
            archetype("second", &[StatChannel::Mobility], &[]),
        ];
        let rec = recommend(&table, &BuildIntent::default(), 5).unwrap();
        assert_eq!(rec.primary.name, "first");
        assert_eq!(rec.alternatives.len(), 1);
        assert!(recommend(&[], &BuildIntent::default(), 1).is_none());
    }

    #[test]
    fn test_score_piece_uses_constraint_over_weight() {
        let a = archetype("a", &[StatChannel::Recovery], &[StatChannel::Mobility]);
        let piece = ItemDefinition::new("p", "P", ItemKind::Armor)
            .with_stat(StatChannel::Recovery, 10)
            .with_stat(StatChannel::Mobility, 4);

        let plain = BuildIntent::default();
        assert_eq!(score_piece(&piece, &plain, &a), 10.0 + 2.0);

        let mut constrained = BuildIntent::default();
        constrained
            .numeric_constraints
            .insert(StatChannel::Recovery, 100);
        assert_eq!(score_piece(&piece, &constrained, &a), 1000.0 + 2.0);
    }

    #[test]
    fn test_top_tier_bonus() {
        let a = archetype("a", &[StatChannel::Recovery], &[]);
        let piece = ItemDefinition::new("p", "P", ItemKind::Armor)
            .with_quality(PieceQuality::Masterworked);
        assert_eq!(score_piece(&piece, &BuildIntent::default(), &a), TOP_TIER_PIECE_BONUS);
    }

    #[test]
    fn test_explicit_weight_wins() {
        let mut a = archetype("a", &[StatChannel::Recovery], &[]);
        a.weights = vec![(StatChannel::Recovery, 2.5)];
        assert_eq!(a.weight(StatChannel::Recovery), 2.5);
        assert_eq!(a.weight(StatChannel::Strength), OTHER_WEIGHT);
    }

    #[test]
    fn test_piece_fit() {
        let a = archetype("a", &[StatChannel::Recovery], &[StatChannel::Mobility]);
        let piece = ItemDefinition::new("p", "P", ItemKind::Armor)
            .with_stat(StatChannel::Recovery, 10)
            .with_stat(StatChannel::Mobility, 10)
            .with_stat(StatChannel::Strength, 20);
        // (10 + 5) / 40
        assert!((piece_fit(&piece, &a) - 37.5).abs() < 1e-9);

        let empty = ItemDefinition::new("e", "E", ItemKind::Armor);
        assert_eq!(piece_fit(&empty, &a), 0.0);
    }

    #[test]
    fn test_feasibility_with_default_limits() {
        let limits = FeasibilityLimits::default();
        // 150 + 10 + 50 capped at 200
        assert_eq!(limits.max_reachable(StatChannel::Intellect), 200);

        let mut a = archetype("a", &[StatChannel::Intellect], &[]);
        a.min_primary_tier = 20;
        assert!(feasibility(&a, &limits).feasible);
    }

    #[test]
    fn test_feasibility_from_sparse_catalog() {
        let catalog = CatalogIndex::from_items(vec![
            ItemDefinition::new("helm", "Helm", ItemKind::Armor)
                .with_slot(Slot::Helmet)
                .with_stat(StatChannel::Strength, 20),
            ItemDefinition::new("mod", "Strength Mod", ItemKind::Mod)
                .with_stat(StatChannel::Strength, 10),
        ])
        .unwrap();
        let limits = FeasibilityLimits::from_catalog(&catalog, ClassAffinity::Any, 1);
        assert!(!limits.masterwork_allowed);
        assert_eq!(limits.max_reachable(StatChannel::Strength), 30);
        assert_eq!(limits.max_reachable(StatChannel::Mobility), 10);

        let mut a = archetype("a", &[StatChannel::Strength], &[StatChannel::Mobility]);
        a.min_primary_tier = 5;
        a.min_secondary_tier = 1;
        let result = feasibility(&a, &limits);
        assert!(!result.feasible);
        assert_eq!(result.unmet_channels, vec![StatChannel::Strength]);
    }
}
