//! Composite build scorer.
//!
//! Six axis scores, each 0–100, folded into a weighted overall score.
//! Axes below their threshold become weaknesses with a recommendation;
//! axes at or above the strength threshold become strengths.

use crate::activity::{item_activity_fit, threshold_fit, thresholds_for, unmet_thresholds};
use crate::archetype::{piece_fit, Archetype};
use crate::build::{Build, Diagnostic, SynergyKind};
use crate::catalog::{CatalogIndex, ItemDefinition, ItemKind, Slot, SlotGroup};
use crate::config::{AxisValues, EngineConfig};
use crate::content::ContentTables;
use crate::intent::BuildIntent;
use crate::stats::{efficiency, tier, StatChannel, MAX_TIER};
use crate::weapon::score_weapon;
use serde::{Deserialize, Serialize};

/// Exotic utilization of a build without exotics.
const NO_EXOTIC_SCORE: f64 = 30.0;
/// Base exotic utilization when exotics are equipped.
const EXOTIC_BASE: f64 = 60.0;
/// Penalty per slot group holding more than one exotic.
const EXOTIC_OVERLOAD_PENALTY: f64 = 40.0;

/// Scores and commentary for one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub stat_optimization: f64,
    pub synergy_strength: f64,
    pub activity_fit: f64,
    pub weapon_synergy: f64,
    pub armor_optimization: f64,
    pub exotic_utilization: f64,
    /// Weighted mean of the axes, 0–100.
    pub overall_score: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ScoreReport {
    /// Axis scores in the same order as [`AxisValues::as_array`].
    pub fn axes(&self) -> AxisValues {
        AxisValues::new(
            self.stat_optimization,
            self.synergy_strength,
            self.activity_fit,
            self.weapon_synergy,
            self.armor_optimization,
            self.exotic_utilization,
        )
    }
}

const AXIS_LABELS: [&str; 6] = [
    "stat optimization",
    "synergy strength",
    "activity fit",
    "weapon synergy",
    "armor optimization",
    "exotic utilization",
];

/// Position of the activity-fit axis in [`AxisValues::as_array`].
const ACTIVITY_FIT_AXIS: usize = 2;

const AXIS_ADVICE: [&str; 6] = [
    "Move stat points onto the priority stats and land them on tier boundaries",
    "Add items whose perks feed each other, such as orb generation with ability regeneration",
    "Raise the stats the activity expects before taking this build into it",
    "Use weapon types that suit the activity and playstyle",
    "Swap armor pieces for ones that roll the archetype's primary stats",
    "Equip an exotic that suits the activity",
];

/// Scorer over shared engine data.
#[derive(Debug, Clone, Copy)]
pub struct CompositeScorer<'a> {
    catalog: &'a CatalogIndex,
    content: &'a ContentTables,
    config: &'a EngineConfig,
}

impl<'a> CompositeScorer<'a> {
    pub fn new(catalog: &'a CatalogIndex, content: &'a ContentTables, config: &'a EngineConfig) -> Self {
        Self {
            catalog,
            content,
            config,
        }
    }

    /// Score a build. Pure: the same build and intent always give the same report.
    pub fn score(&self, build: &Build, intent: &BuildIntent) -> ScoreReport {
        let archetype = self
            .content
            .archetypes
            .iter()
            .find(|a| a.name == build.archetype);
        let equipped = build.equipped(self.catalog);
        let activity_thresholds = thresholds_for(&self.content.activities, build.activity);

        let axes = AxisValues::new(
            stat_optimization(build, intent, archetype),
            synergy_strength(build),
            threshold_fit(activity_thresholds, &build.stats),
            self.weapon_synergy(&equipped, intent),
            armor_optimization(build, self.catalog, archetype),
            self.exotic_utilization(build, &equipped),
        );

        let weights = self.config.weights_for(build.activity);
        let overall = weighted_overall(&axes, weights);

        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();
        let mut recommendations = Vec::new();
        let thresholds = self.config.thresholds.as_axes().as_array();
        for (i, value) in axes.as_array().into_iter().enumerate() {
            tracing::debug!(axis = AXIS_LABELS[i], score = value, "axis scored");
            if value >= self.config.strength_threshold {
                strengths.push(format!("Strong {} ({value:.0})", AXIS_LABELS[i]));
            }
            if value < thresholds[i] {
                weaknesses.push(format!(
                    "Low {} ({value:.0} < {:.0})",
                    AXIS_LABELS[i], thresholds[i]
                ));
                recommendations.push(AXIS_ADVICE[i].to_string());
                if i == ACTIVITY_FIT_AXIS {
                    let unmet = unmet_thresholds(activity_thresholds, &build.stats);
                    for (channel, required, actual) in unmet {
                        recommendations.push(format!(
                            "Raise {channel} from {actual} to {required} for {}",
                            build.activity
                        ));
                    }
                }
            }
        }

        for diagnostic in &build.diagnostics {
            recommendations.push(diagnostic_advice(diagnostic));
        }
        for conflict in &build.conflicts {
            recommendations.push(format!("Resolve conflict: {}", conflict.description));
        }

        ScoreReport {
            stat_optimization: axes.stat_optimization,
            synergy_strength: axes.synergy_strength,
            activity_fit: axes.activity_fit,
            weapon_synergy: axes.weapon_synergy,
            armor_optimization: axes.armor_optimization,
            exotic_utilization: axes.exotic_utilization,
            overall_score: overall,
            strengths,
            weaknesses,
            recommendations,
        }
    }

    /// Mean weapon score of the equipped weapons, 0 when none are equipped.
    fn weapon_synergy(&self, equipped: &[&ItemDefinition], intent: &BuildIntent) -> f64 {
        let scores: Vec<f64> = equipped
            .iter()
            .filter(|item| item.kind == ItemKind::Weapon)
            .map(|item| score_weapon(&self.content.weapons, item, intent).score)
            .collect();
        mean(&scores)
    }

    fn exotic_utilization(&self, build: &Build, equipped: &[&ItemDefinition]) -> f64 {
        let fits: Vec<f64> = equipped
            .iter()
            .filter(|item| item.is_exotic())
            .map(|item| {
                item_activity_fit(
                    item,
                    build.activity,
                    &self.content.activities,
                    &self.content.weapons,
                )
            })
            .collect();
        if fits.is_empty() {
            return NO_EXOTIC_SCORE;
        }
        let overloaded = [SlotGroup::Weapon, SlotGroup::Armor]
            .into_iter()
            .filter(|&g| build.exotic_count(g, self.catalog) > 1)
            .count();
        (EXOTIC_BASE + 40.0 * mean(&fits) - EXOTIC_OVERLOAD_PENALTY * overloaded as f64)
            .clamp(0.0, 100.0)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// `round(Σ axis·w / Σ w)`, clamped to 0–100.
pub fn weighted_overall(axes: &AxisValues, weights: &AxisValues) -> u32 {
    let total_weight = weights.sum();
    if total_weight <= 0.0 {
        return 0;
    }
    let weighted: f64 = axes
        .as_array()
        .iter()
        .zip(weights.as_array())
        .map(|(a, w)| a * w)
        .sum();
    (weighted / total_weight).round().clamp(0.0, 100.0) as u32
}

/// Mean over the priority stats (archetype focus when none were asked for)
/// of `min(100, tier / 20 · 100 + 5 · efficiency)`.
fn stat_optimization(build: &Build, intent: &BuildIntent, archetype: Option<&Archetype>) -> f64 {
    let channels: Vec<StatChannel> = if !intent.priority_stats.is_empty() {
        intent.priority_stats.clone()
    } else if let Some(archetype) = archetype {
        archetype.focus_channels()
    } else {
        StatChannel::ALL.to_vec()
    };
    let scores: Vec<f64> = channels
        .iter()
        .map(|&ch| {
            let value = build.stats.get(ch);
            let tier_score = f64::from(tier(value)) / f64::from(MAX_TIER) * 100.0;
            (tier_score + 5.0 * efficiency(value)).min(100.0)
        })
        .collect();
    mean(&scores)
}

/// Sum of matched-pattern strengths, capped at 100. Activity, element, stat
/// and loop findings explain the build but do not add to this axis.
fn synergy_strength(build: &Build) -> f64 {
    build
        .synergies
        .iter()
        .filter(|s| s.kind == SynergyKind::Pattern)
        .map(|s| s.strength.points())
        .sum::<f64>()
        .min(100.0)
}

/// Mean archetype fit over the five armor slots; empty slots count as 0.
fn armor_optimization(build: &Build, catalog: &CatalogIndex, archetype: Option<&Archetype>) -> f64 {
    let Some(archetype) = archetype else {
        return 0.0;
    };
    let total: f64 = Slot::ARMOR
        .iter()
        .filter_map(|&slot| build.chosen(slot))
        .filter_map(|id| catalog.get(id))
        .map(|piece| piece_fit(piece, archetype))
        .sum();
    total / Slot::ARMOR.len() as f64
}

fn diagnostic_advice(diagnostic: &Diagnostic) -> String {
    match diagnostic {
        Diagnostic::NoCandidateFound { slot } => {
            format!("Acquire an item for the {slot} slot")
        }
        Diagnostic::InfeasibleConstraint {
            channel,
            required,
            achievable,
        } => format!("{required} {channel} is out of reach; at most {achievable} is achievable"),
        Diagnostic::LockedItemRejected { item_id, reason } => {
            format!("Locked item {item_id} was not used: {reason}")
        }
        Diagnostic::UnknownLockedItem { item_id } => {
            format!("Locked item {item_id} is not in the catalog")
        }
        Diagnostic::LowConfidence { .. } => {
            "Name the activity, class or stats you want for a more precise build".to_string()
        }
    }
}
