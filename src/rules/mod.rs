//! Synergy and trigger rule base.
//!
//! The rule base is declarative data: triggers, effects, synergy patterns,
//! conflict rules and element affinities, loaded from RON and validated
//! once. Queries over it are pure functions of the tables and their inputs.
//!
//! ```text
//! item text ──detect_in_text──▶ (triggers, effects)
//!                                    │
//!          ┌─────────────────────────┼──────────────────────┐
//!          ▼                         ▼                      ▼
//! find_matching_patterns     resolve_conflicts       active_chains
//! ```

pub mod chain;
pub mod conflict;
pub mod matching;
pub mod model;
pub mod stacking;

pub use chain::{ChainGraph, ChainNode, TriggerChain};
pub use conflict::{resolve_conflicts, ActiveEntry};
pub use matching::{find_matching_patterns, PatternMatch, MATCH_THRESHOLD};
pub use model::{
    ConflictRule, Effect, ElementAffinity, Frequency, Impact, Reliability, Resolution,
    RuleTables, Strength, Sustainability, SynergyPattern, Trigger,
};
pub use stacking::{stack, EffectInstance, OverwriteBy, StackOutcome, StackingMode};

use crate::catalog::DamageElement;
use crate::error::EngineError;
use std::collections::{BTreeMap, BTreeSet};

/// Built-in rule tables.
pub(crate) const BUILTIN_RULES: &str = include_str!("../../data/rules.ron");

/// Triggers and effects found in a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detected {
    pub triggers: BTreeSet<String>,
    pub effects: BTreeSet<String>,
}

impl Detected {
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty() && self.effects.is_empty()
    }

    pub fn extend(&mut self, other: Detected) {
        self.triggers.extend(other.triggers);
        self.effects.extend(other.effects);
    }
}

/// Validated rule tables plus the derived chain graph.
///
/// # Examples
///
/// ```rust
/// use buildsmith::rules::RuleBase;
///
/// let rules = RuleBase::builtin().unwrap();
/// let found = rules.detect_in_text("Rapid final blows create orbs of power");
/// assert!(found.triggers.contains("kill"));
/// ```
#[derive(Debug, Clone)]
pub struct RuleBase {
    tables: RuleTables,
    triggers: BTreeMap<String, usize>,
    effects: BTreeMap<String, usize>,
    chains: ChainGraph,
}

impl RuleBase {
    /// Validate `tables` and index them.
    pub fn from_tables(tables: RuleTables) -> Result<Self, EngineError> {
        let triggers = index_ids("triggers", tables.triggers.iter().map(|t| t.id.as_str()))?;
        let effects = index_ids("effects", tables.effects.iter().map(|e| e.id.as_str()))?;
        index_ids("patterns", tables.patterns.iter().map(|p| p.id.as_str()))?;
        index_ids("conflicts", tables.conflicts.iter().map(|c| c.id.as_str()))?;

        let require_trigger = |table: &str, id: &str| -> Result<(), EngineError> {
            if triggers.contains_key(id) {
                Ok(())
            } else {
                Err(unknown(table, id))
            }
        };
        let require_effect = |table: &str, id: &str| -> Result<(), EngineError> {
            if effects.contains_key(id) {
                Ok(())
            } else {
                Err(unknown(table, id))
            }
        };
        let require_any = |table: &str, id: &str| -> Result<(), EngineError> {
            if triggers.contains_key(id) || effects.contains_key(id) {
                Ok(())
            } else {
                Err(unknown(table, id))
            }
        };

        for effect in &tables.effects {
            if !effect.magnitude.is_finite() || !effect.duration_secs.is_finite() {
                return Err(EngineError::Configuration(format!(
                    "effect `{}` has a non-finite magnitude or duration",
                    effect.id
                )));
            }
            if let StackingMode::MultiplicativeCapped { cap } = effect.stacking {
                if cap.is_nan() || cap <= 0.0 {
                    return Err(EngineError::Configuration(format!(
                        "effect `{}` declares a non-positive stacking cap",
                        effect.id
                    )));
                }
            }
            for fed in &effect.feeds {
                require_trigger("effects", fed)?;
            }
        }

        for pattern in &tables.patterns {
            if pattern.triggers.is_empty() || pattern.effects.is_empty() {
                return Err(EngineError::Configuration(format!(
                    "pattern `{}` needs at least one trigger and one effect",
                    pattern.id
                )));
            }
            for id in &pattern.triggers {
                require_trigger("patterns", id)?;
            }
            for id in &pattern.effects {
                require_effect("patterns", id)?;
            }
        }

        for rule in &tables.conflicts {
            require_any("conflicts", &rule.left)?;
            require_any("conflicts", &rule.right)?;
            if let Resolution::PriorityOrder(order) = &rule.resolution {
                for id in order {
                    require_any("conflicts", id)?;
                }
            }
        }

        for affinity in &tables.affinities {
            for id in &affinity.triggers {
                require_trigger("affinities", id)?;
            }
            for id in &affinity.effects {
                require_effect("affinities", id)?;
            }
        }

        let chains = ChainGraph::from_tables(&tables);
        tracing::debug!(
            version = tables.version,
            triggers = tables.triggers.len(),
            effects = tables.effects.len(),
            patterns = tables.patterns.len(),
            "rule base loaded"
        );

        Ok(Self {
            tables,
            triggers,
            effects,
            chains,
        })
    }

    /// Parse and validate RON rule tables.
    pub fn from_ron_str(ron_text: &str) -> Result<Self, EngineError> {
        let tables: RuleTables =
            ron::from_str(ron_text).map_err(|e| EngineError::parse("rule tables", e))?;
        Self::from_tables(tables)
    }

    /// The rule tables shipped with the crate.
    pub fn builtin() -> Result<Self, EngineError> {
        Self::from_ron_str(BUILTIN_RULES)
    }

    pub fn version(&self) -> u32 {
        self.tables.version
    }

    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    pub fn trigger(&self, id: &str) -> Option<&Trigger> {
        self.triggers.get(id).map(|&i| &self.tables.triggers[i])
    }

    pub fn effect(&self, id: &str) -> Option<&Effect> {
        self.effects.get(id).map(|&i| &self.tables.effects[i])
    }

    pub fn affinity(&self, element: DamageElement) -> Option<&ElementAffinity> {
        self.tables.affinities.iter().find(|a| a.element == element)
    }

    /// Trigger and effect ids whose keywords occur in `text`.
    pub fn detect_in_text(&self, text: &str) -> Detected {
        let lower = text.to_lowercase();
        let hit = |keywords: &[String]| keywords.iter().any(|k| lower.contains(k.as_str()));
        Detected {
            triggers: self
                .tables
                .triggers
                .iter()
                .filter(|t| hit(&t.keywords))
                .map(|t| t.id.clone())
                .collect(),
            effects: self
                .tables
                .effects
                .iter()
                .filter(|e| hit(&e.keywords))
                .map(|e| e.id.clone())
                .collect(),
        }
    }

    /// Patterns covered by the active set, best first.
    pub fn find_matching_patterns(
        &self,
        triggers: &BTreeSet<String>,
        effects: &BTreeSet<String>,
    ) -> Vec<PatternMatch> {
        find_matching_patterns(&self.tables.patterns, triggers, effects)
    }

    /// Settle declared conflicts among `active`.
    pub fn resolve_conflicts(&self, active: Vec<ActiveEntry>) -> Vec<ActiveEntry> {
        resolve_conflicts(&self.tables.conflicts, active)
    }

    /// Conflict rules with both sides present in `active_ids`, in id order.
    pub fn conflicts_among(&self, active_ids: &BTreeSet<String>) -> Vec<&ConflictRule> {
        let mut rules: Vec<&ConflictRule> = self
            .tables
            .conflicts
            .iter()
            .filter(|r| active_ids.contains(&r.left) && active_ids.contains(&r.right))
            .collect();
        rules.sort_by(|a, b| a.id.cmp(&b.id));
        rules
    }

    /// Stack active effect instances, grouped by effect id.
    ///
    /// Entries whose id is not a known effect are ignored. Entries are sorted
    /// before folding so the result is bit-identical for any input order.
    pub fn stack_effects(&self, active: &[ActiveEntry]) -> BTreeMap<String, StackOutcome> {
        let mut sorted: Vec<&ActiveEntry> = active.iter().collect();
        sorted.sort_by(|a, b| conflict::entry_order(a, b));

        let mut groups: BTreeMap<&str, Vec<EffectInstance>> = BTreeMap::new();
        for entry in sorted {
            if self.effects.contains_key(&entry.id) {
                groups
                    .entry(entry.id.as_str())
                    .or_default()
                    .push(EffectInstance::new(entry.magnitude, entry.duration_secs));
            }
        }

        groups
            .into_iter()
            .filter_map(|(id, instances)| {
                self.effect(id)
                    .map(|effect| (id.to_string(), stack(effect.stacking, &instances)))
            })
            .collect()
    }

    /// Trigger chains and loops among the active set.
    pub fn active_chains(
        &self,
        triggers: &BTreeSet<String>,
        effects: &BTreeSet<String>,
    ) -> Vec<TriggerChain> {
        self.chains.active_chains(triggers, effects)
    }
}

fn unknown(table: &str, id: &str) -> EngineError {
    EngineError::UnknownReference {
        table: table.to_string(),
        id: id.to_string(),
    }
}

fn index_ids<'a>(
    table: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<BTreeMap<String, usize>, EngineError> {
    let mut index = BTreeMap::new();
    let mut duplicates = BTreeSet::new();
    for (i, id) in ids.enumerate() {
        if index.insert(id.to_string(), i).is_some() {
            duplicates.insert(id.to_string());
        }
    }
    if duplicates.is_empty() {
        Ok(index)
    } else {
        Err(EngineError::DuplicateIds {
            table: table.to_string(),
            ids: duplicates.into_iter().collect(),
        })
    }
}
