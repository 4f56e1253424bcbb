//! Mod selection rules.
//!
//! Mods are chosen from rule tables keyed on activity and priority stats.
//! A mod with stat contributions is a stat mod; anything else is a combat
//! mod. Each category has its own cap.

use crate::catalog::{CatalogIndex, ClassAffinity, ItemDefinition};
use crate::config::ModCaps;
use crate::intent::{Activity, BuildIntent};
use crate::item_id::ItemId;
use crate::stats::StatChannel;
use serde::{Deserialize, Serialize};

/// Mod category with its own selection cap.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModCategory {
    Stat,
    Combat,
}

impl ModCategory {
    pub fn of(item: &ItemDefinition) -> Self {
        if item.stat_contributions.is_empty() {
            ModCategory::Combat
        } else {
            ModCategory::Stat
        }
    }
}

/// One row of the mod table.
///
/// A rule applies when the intent's activity is listed (or the list is
/// empty) and one of its priority stats is wanted (or the list is empty).
/// An applying rule adds `weight` to every mod whose text contains one of
/// the `prefer` keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModRule {
    pub id: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub priority_stats: Vec<StatChannel>,
    pub prefer: Vec<String>,
    pub weight: f64,
}

impl ModRule {
    fn applies(&self, intent: &BuildIntent) -> bool {
        let activity = self.activities.is_empty() || self.activities.contains(&intent.activity);
        let stats = self.priority_stats.is_empty()
            || self
                .priority_stats
                .iter()
                .any(|ch| intent.priority_stats.contains(ch));
        activity && stats
    }
}

/// A selected mod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModPick {
    pub item_id: ItemId,
    pub name: String,
    pub category: ModCategory,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Score one mod for an intent.
fn score_mod(mod_item: &ItemDefinition, rules: &[&ModRule], intent: &BuildIntent) -> (f64, Vec<String>) {
    let text = mod_item.searchable_text();
    let mut score = 0.0;
    let mut reasons = Vec::new();

    for rule in rules {
        if rule.prefer.iter().any(|k| text.contains(&k.to_lowercase())) {
            score += rule.weight;
            reasons.push(format!("rule {}", rule.id));
        }
    }

    for ch in &intent.priority_stats {
        let amount = mod_item.stat_contributions.get(ch).copied().unwrap_or(0);
        if amount > 0 {
            score += f64::from(amount);
            reasons.push(format!("+{amount} {ch}"));
        }
    }

    (score, reasons)
}

/// Pick mods for an intent.
///
/// Only mods with a positive score are picked. Within each category mods
/// are ranked by score, then id, and cut at the category cap.
///
/// # Examples
///
/// ```rust
/// use buildsmith::catalog::CatalogIndex;
/// use buildsmith::config::ModCaps;
/// use buildsmith::intent::BuildIntent;
/// use buildsmith::mods::select_mods;
/// use buildsmith::{ClassAffinity, ItemDefinition, ItemKind, StatChannel};
///
/// let catalog = CatalogIndex::from_items(vec![
///     ItemDefinition::new("rec_mod", "Recovery Mod", ItemKind::Mod)
///         .with_stat(StatChannel::Recovery, 10),
///     ItemDefinition::new("mob_mod", "Mobility Mod", ItemKind::Mod)
///         .with_stat(StatChannel::Mobility, 10),
/// ])
/// .unwrap();
/// let intent = BuildIntent {
///     priority_stats: vec![StatChannel::Recovery],
///     ..BuildIntent::default()
/// };
///
/// let picks = select_mods(&catalog, &[], &intent, ClassAffinity::Any, ModCaps::default());
/// assert_eq!(picks.len(), 1);
/// assert_eq!(picks[0].item_id.as_str(), "rec_mod");
/// ```
pub fn select_mods(
    catalog: &CatalogIndex,
    rules: &[ModRule],
    intent: &BuildIntent,
    class: ClassAffinity,
    caps: ModCaps,
) -> Vec<ModPick> {
    let applying: Vec<&ModRule> = rules.iter().filter(|r| r.applies(intent)).collect();

    let mut scored: Vec<ModPick> = catalog
        .mods()
        .into_iter()
        .filter(|m| m.class_affinity.accepts(class))
        .filter(|m| !intent.use_inventory_only || catalog.is_owned(&m.id))
        .filter_map(|m| {
            let (score, reasons) = score_mod(m, &applying, intent);
            (score > 0.0).then(|| ModPick {
                item_id: m.id.clone(),
                name: m.name.clone(),
                category: ModCategory::of(m),
                score,
                reasons,
            })
        })
        .collect();

    // catalog order is id order, so a stable sort breaks ties by id
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut stat_left = caps.stat;
    let mut combat_left = caps.combat;
    scored
        .into_iter()
        .filter(|pick| {
            let left = match pick.category {
                ModCategory::Stat => &mut stat_left,
                ModCategory::Combat => &mut combat_left,
            };
            if *left == 0 {
                return false;
            }
            *left -= 1;
            true
        })
        .inspect(|pick| tracing::debug!(item = %pick.item_id, score = pick.score, "mod selected"))
        .collect()
}
