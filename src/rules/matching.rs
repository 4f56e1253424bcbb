//! Synergy pattern matching.

use super::model::{Strength, SynergyPattern};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum `overall_match` for a pattern to be reported.
pub const MATCH_THRESHOLD: f64 = 0.4;

/// How well the active triggers and effects cover one pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern_id: String,
    pub name: String,
    pub strength: Strength,
    /// Fraction of the pattern's triggers that are active.
    pub trigger_coverage: f64,
    /// Fraction of the pattern's effects that are active.
    pub effect_coverage: f64,
    /// `(trigger_coverage + effect_coverage) / 2`.
    pub overall_match: f64,
    pub matched: Vec<String>,
}

fn coverage<'a>(
    declared: &'a [String],
    active: &BTreeSet<String>,
    matched: &mut Vec<String>,
) -> f64 {
    if declared.is_empty() {
        return 0.0;
    }
    let hits: Vec<&'a String> = declared.iter().filter(|id| active.contains(*id)).collect();
    matched.extend(hits.iter().map(|id| (*id).clone()));
    hits.len() as f64 / declared.len() as f64
}

/// Find patterns covered by the active triggers and effects.
///
/// Results above [`MATCH_THRESHOLD`], best first; equal scores are ordered
/// by pattern id.
pub fn find_matching_patterns(
    patterns: &[SynergyPattern],
    triggers: &BTreeSet<String>,
    effects: &BTreeSet<String>,
) -> Vec<PatternMatch> {
    let mut matches: Vec<PatternMatch> = patterns
        .iter()
        .filter_map(|pattern| {
            let mut matched = Vec::new();
            let tc = coverage(&pattern.triggers, triggers, &mut matched);
            let ec = coverage(&pattern.effects, effects, &mut matched);
            let overall = (tc + ec) / 2.0;
            (overall > MATCH_THRESHOLD).then(|| PatternMatch {
                pattern_id: pattern.id.clone(),
                name: pattern.name.clone(),
                strength: pattern.strength,
                trigger_coverage: tc,
                effect_coverage: ec,
                overall_match: overall,
                matched,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.overall_match
            .total_cmp(&a.overall_match)
            .then_with(|| a.pattern_id.cmp(&b.pattern_id))
    });
    matches
}
