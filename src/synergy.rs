//! Synergy and conflict detection for an assembled build.
//!
//! Item names and descriptions are mined for rule-base keywords, the
//! subclass element adds its affinity, and the resulting active set is run
//! through conflict resolution, pattern matching and loop detection. Stat
//! totals, weapon elements and activity thresholds add their own findings.

use crate::activity::{thresholds_for, ActivityProfile};
use crate::archetype::Archetype;
use crate::build::{Conflict, Synergy, SynergyKind};
use crate::catalog::{DamageElement, ItemDefinition, ItemKind};
use crate::intent::BuildIntent;
use crate::rules::{ActiveEntry, Reliability, Resolution, RuleBase, Strength};
use crate::stats::{effects_at, tier, ResolvedStats, StatChannel, SECONDARY_EFFECT_THRESHOLD};
use std::collections::{BTreeMap, BTreeSet};

/// Tier at which a secondary-effect channel counts as a strong synergy.
const HIGH_STAT_TIER: u32 = 15;

/// Fraction of an activity threshold below which a conflict is reported.
const THRESHOLD_SHORTFALL: f64 = 0.5;

fn reliability_magnitude(reliability: Reliability) -> f64 {
    match reliability {
        Reliability::Low => 33.0,
        Reliability::Medium => 66.0,
        Reliability::High => 100.0,
    }
}

/// Synergies and conflicts found in one build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub synergies: Vec<Synergy>,
    pub conflicts: Vec<Conflict>,
}

/// Everything the detector looks at.
#[derive(Debug, Clone, Copy)]
pub struct DetectionInput<'a> {
    /// Equipped weapons, armor, mods and subclass components.
    pub items: &'a [&'a ItemDefinition],
    pub element: Option<DamageElement>,
    pub intent: &'a BuildIntent,
    pub archetype: &'a Archetype,
    pub stats: &'a ResolvedStats,
}

/// Rule-driven synergy detector.
#[derive(Debug, Clone, Copy)]
pub struct SynergyDetector<'a> {
    rules: &'a RuleBase,
    activities: &'a [ActivityProfile],
}

impl<'a> SynergyDetector<'a> {
    pub fn new(rules: &'a RuleBase, activities: &'a [ActivityProfile]) -> Self {
        Self { rules, activities }
    }

    pub fn detect(&self, input: DetectionInput<'_>) -> Findings {
        let mut findings = Findings::default();
        self.detect_rules(&input, &mut findings);
        detect_elements(&input, &mut findings);
        detect_stats(&input, &mut findings);
        self.detect_activity(&input, &mut findings);

        tracing::debug!(
            synergies = findings.synergies.len(),
            conflicts = findings.conflicts.len(),
            "synergy detection finished"
        );
        findings
    }

    /// Active triggers and effects with the item ids that grant them.
    fn active_sources(&self, input: &DetectionInput<'_>) -> BTreeMap<String, BTreeSet<String>> {
        let mut sources: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for item in input.items {
            let found = self.rules.detect_in_text(&item.searchable_text());
            for id in found.triggers.into_iter().chain(found.effects) {
                sources.entry(id).or_default().insert(item.id.to_string());
            }
        }
        if let Some(affinity) = input.element.and_then(|e| self.rules.affinity(e)) {
            let label = format!("subclass:{}", affinity.element);
            for id in affinity.triggers.iter().chain(&affinity.effects) {
                sources.entry(id.clone()).or_default().insert(label.clone());
            }
        }
        sources
    }

    fn detect_rules(&self, input: &DetectionInput<'_>, findings: &mut Findings) {
        let sources = self.active_sources(input);
        if sources.is_empty() {
            return;
        }

        let mut entries = Vec::new();
        for (id, granted_by) in &sources {
            let (magnitude, duration) = if let Some(trigger) = self.rules.trigger(id) {
                (reliability_magnitude(trigger.reliability), 0.0)
            } else if let Some(effect) = self.rules.effect(id) {
                (effect.magnitude, effect.duration_secs)
            } else {
                continue;
            };
            for source in granted_by {
                entries.push(ActiveEntry::new(id, source, magnitude, duration));
            }
        }

        let ids: BTreeSet<String> = sources.keys().cloned().collect();
        for rule in self.rules.conflicts_among(&ids) {
            let outcome = match &rule.resolution {
                Resolution::HighestMagnitude => "the stronger one applies".to_string(),
                Resolution::LongestDuration => "the longer one applies".to_string(),
                Resolution::PriorityOrder(order) => format!(
                    "`{}` takes priority",
                    order
                        .iter()
                        .find(|id| **id == rule.left || **id == rule.right)
                        .unwrap_or(&rule.left)
                ),
                Resolution::AdditiveCap(cap) => format!("combined value capped at {cap}"),
            };
            findings.conflicts.push(Conflict {
                id: rule.id.clone(),
                kind: SynergyKind::TriggerChain,
                strength: Strength::Medium,
                description: format!("{} and {} do not stack; {outcome}", rule.left, rule.right),
                involved_ids: vec![rule.left.clone(), rule.right.clone()],
            });
        }

        let resolved = self.rules.resolve_conflicts(entries);
        let mut triggers = BTreeSet::new();
        let mut effects = BTreeSet::new();
        for entry in resolved {
            if self.rules.trigger(&entry.id).is_some() {
                triggers.insert(entry.id);
            } else {
                effects.insert(entry.id);
            }
        }

        for m in self.rules.find_matching_patterns(&triggers, &effects) {
            findings.synergies.push(Synergy {
                id: m.pattern_id.clone(),
                kind: SynergyKind::Pattern,
                strength: m.strength,
                description: format!("{} ({:.0}% covered)", m.name, m.overall_match * 100.0),
                involved_ids: m.matched.clone(),
            });
            let suits_activity = self
                .rules
                .tables()
                .patterns
                .iter()
                .any(|p| p.id == m.pattern_id && p.activities.contains(&input.intent.activity));
            if suits_activity {
                findings.synergies.push(Synergy {
                    id: format!("{}:{}", m.pattern_id, input.intent.activity),
                    kind: SynergyKind::Activity,
                    strength: Strength::Medium,
                    description: format!("{} suits {}", m.name, input.intent.activity),
                    involved_ids: m.matched,
                });
            }
        }

        for chain in self.rules.active_chains(&triggers, &effects) {
            if !chain.self_sustaining {
                continue;
            }
            let ids: Vec<String> = chain.nodes.iter().map(|n| n.id().to_string()).collect();
            findings.synergies.push(Synergy {
                id: format!("loop:{}", ids.join(">")),
                kind: SynergyKind::TriggerChain,
                strength: Strength::High,
                description: format!("Self-sustaining loop: {}", ids.join(" -> ")),
                involved_ids: ids,
            });
        }
    }

    fn detect_activity(&self, input: &DetectionInput<'_>, findings: &mut Findings) {
        let activity = input.intent.activity;
        for &(channel, required) in thresholds_for(self.activities, activity) {
            let actual = input.stats.totals.get(channel);
            if f64::from(actual) < f64::from(required) * THRESHOLD_SHORTFALL {
                findings.conflicts.push(Conflict {
                    id: format!("activity:{activity}:{channel}"),
                    kind: SynergyKind::Activity,
                    strength: Strength::Medium,
                    description: format!(
                        "{channel} {actual} is well below the {required} recommended for {activity}"
                    ),
                    involved_ids: vec![channel.to_string()],
                });
            }
        }
    }
}

fn detect_elements(input: &DetectionInput<'_>, findings: &mut Findings) {
    let Some(element) = input.element else {
        return;
    };

    let matching: Vec<String> = input
        .items
        .iter()
        .filter(|item| item.kind == ItemKind::Weapon && item.damage_element == element)
        .map(|item| item.id.to_string())
        .collect();
    let strength = match matching.len() {
        0 => None,
        1 => Some(Strength::Low),
        _ => Some(Strength::Medium),
    };
    if let Some(strength) = strength {
        findings.synergies.push(Synergy {
            id: format!("element:{element}"),
            kind: SynergyKind::Element,
            strength,
            description: format!("{} weapon(s) match the {element} subclass", matching.len()),
            involved_ids: matching,
        });
    }

    for item in input.items {
        let clashes = item.kind == ItemKind::Armor
            && item.damage_element.is_subclass_element()
            && item.damage_element != element;
        if clashes {
            findings.conflicts.push(Conflict {
                id: format!("element_mismatch:{}", item.id),
                kind: SynergyKind::Element,
                strength: Strength::Low,
                description: format!(
                    "{} is tuned for {} but the subclass is {element}",
                    item.name, item.damage_element
                ),
                involved_ids: vec![item.id.to_string()],
            });
        }
    }
}

fn detect_stats(input: &DetectionInput<'_>, findings: &mut Findings) {
    let focus: Vec<StatChannel> = if input.intent.priority_stats.is_empty() {
        input.archetype.focus_channels()
    } else {
        input.intent.priority_stats.clone()
    };

    for channel in focus {
        let value = input.stats.totals.get(channel);
        if value < SECONDARY_EFFECT_THRESHOLD {
            continue;
        }
        let strength = if tier(value) >= HIGH_STAT_TIER {
            Strength::High
        } else {
            Strength::Medium
        };
        let fx = effects_at(channel, value);
        findings.synergies.push(Synergy {
            id: format!("stat:{channel}"),
            kind: SynergyKind::Stat,
            strength,
            description: format!(
                "{channel} {value}: {}",
                fx.secondary_effect.unwrap_or(fx.unlocked_effect)
            ),
            involved_ids: vec![channel.to_string()],
        });
    }

    for (channel, overflow) in &input.stats.overflow {
        findings.conflicts.push(Conflict {
            id: format!("overflow:{channel}"),
            kind: SynergyKind::Stat,
            strength: Strength::Low,
            description: format!("{overflow} {channel} points are wasted above the cap"),
            involved_ids: vec![channel.to_string()],
        });
    }
}
