//! Conflict resolution between active triggers and effects.
//!
//! Inputs are sorted before any rule is applied and rules are folded in id
//! order, so the outcome never depends on the order entries were collected.

use super::model::{ConflictRule, Resolution};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One active trigger or effect, with the item that granted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEntry {
    pub id: String,
    pub source: String,
    pub magnitude: f64,
    pub duration_secs: f64,
}

impl ActiveEntry {
    pub fn new(id: &str, source: &str, magnitude: f64, duration_secs: f64) -> Self {
        Self {
            id: id.to_string(),
            source: source.to_string(),
            magnitude,
            duration_secs,
        }
    }
}

pub(crate) fn entry_order(a: &ActiveEntry, b: &ActiveEntry) -> Ordering {
    a.id.cmp(&b.id)
        .then_with(|| a.source.cmp(&b.source))
        .then_with(|| a.magnitude.total_cmp(&b.magnitude))
        .then_with(|| a.duration_secs.total_cmp(&b.duration_secs))
}

/// Best value of `key` among the entries carrying `id`.
fn side_best(active: &[ActiveEntry], id: &str, key: impl Fn(&ActiveEntry) -> f64) -> f64 {
    active
        .iter()
        .filter(|e| e.id == id)
        .map(key)
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Apply every rule whose two sides are both active, dropping the losers.
///
/// # Examples
///
/// ```rust
/// use buildsmith::rules::{resolve_conflicts, ActiveEntry, ConflictRule, Resolution};
///
/// let rules = vec![ConflictRule {
///     id: "stance".into(),
///     left: "aggressive_stance".into(),
///     right: "defensive_stance".into(),
///     resolution: Resolution::HighestMagnitude,
/// }];
/// let active = vec![
///     ActiveEntry::new("defensive_stance", "Shield Helm", 20.0, 10.0),
///     ActiveEntry::new("aggressive_stance", "Fury Gauntlets", 35.0, 6.0),
/// ];
///
/// let kept = resolve_conflicts(&rules, active);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].id, "aggressive_stance");
/// ```
pub fn resolve_conflicts(rules: &[ConflictRule], active: Vec<ActiveEntry>) -> Vec<ActiveEntry> {
    let mut active = active;
    active.sort_by(entry_order);

    let mut ordered: Vec<&ConflictRule> = rules.iter().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    for rule in ordered {
        let has_left = active.iter().any(|e| e.id == rule.left);
        let has_right = active.iter().any(|e| e.id == rule.right);
        if !has_left || !has_right || rule.left == rule.right {
            continue;
        }

        let loser = match &rule.resolution {
            Resolution::HighestMagnitude => {
                let l = side_best(&active, &rule.left, |e| e.magnitude);
                let r = side_best(&active, &rule.right, |e| e.magnitude);
                Some(if r > l { &rule.left } else { &rule.right })
            }
            Resolution::LongestDuration => {
                let l = side_best(&active, &rule.left, |e| e.duration_secs);
                let r = side_best(&active, &rule.right, |e| e.duration_secs);
                Some(if r > l { &rule.left } else { &rule.right })
            }
            Resolution::PriorityOrder(order) => {
                let rank = |id: &str| order.iter().position(|p| p == id).unwrap_or(usize::MAX);
                Some(if rank(&rule.right) < rank(&rule.left) {
                    &rule.left
                } else {
                    &rule.right
                })
            }
            Resolution::AdditiveCap(cap) => {
                active = apply_additive_cap(active, &rule.left, &rule.right, *cap);
                None
            }
        };

        if let Some(loser) = loser {
            tracing::debug!(rule = %rule.id, dropped = %loser, "conflict resolved");
            let loser = loser.clone();
            active.retain(|e| e.id != loser);
        }
    }

    active
}

/// Keep the strongest entries of both sides until their sum reaches `cap`;
/// the entry that crosses it is trimmed to fit.
fn apply_additive_cap(
    active: Vec<ActiveEntry>,
    left: &str,
    right: &str,
    cap: f64,
) -> Vec<ActiveEntry> {
    let (mut contested, mut rest): (Vec<_>, Vec<_>) = active
        .into_iter()
        .partition(|e| e.id == left || e.id == right);

    contested.sort_by(|a, b| {
        b.magnitude
            .total_cmp(&a.magnitude)
            .then_with(|| entry_order(a, b))
    });

    let mut remaining = cap.max(0.0);
    for mut entry in contested {
        if remaining <= 0.0 {
            tracing::debug!(id = %entry.id, source = %entry.source, "dropped by additive cap");
            continue;
        }
        if entry.magnitude > remaining {
            entry.magnitude = remaining;
        }
        remaining -= entry.magnitude;
        rest.push(entry);
    }

    rest.sort_by(entry_order);
    rest
}
