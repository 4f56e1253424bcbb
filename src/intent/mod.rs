//! Intent parsing module.
//!
//! Turns a free-text request plus explicit options into a [`BuildIntent`].
//! Parsing never fails: text the parser cannot make sense of simply leaves
//! the defaults in place and lowers [`BuildIntent::confidence`].

pub mod keywords;

use crate::catalog::{CatalogIndex, ClassAffinity, DamageElement, WeaponType};
use crate::item_id::ItemId;
use crate::stats::StatChannel;
use keywords::{scan, KeywordTarget, REQUEST_PHRASES};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

/// Game activity a build is meant for.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Activity {
    #[default]
    General,
    Raid,
    Dungeon,
    Nightfall,
    Strike,
    Crucible,
    Trials,
    Gambit,
    Solo,
}

impl Activity {
    /// Player-versus-player activities.
    pub fn is_pvp(self) -> bool {
        matches!(self, Activity::Crucible | Activity::Trials)
    }
}

/// How the player wants the build to play.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Playstyle {
    #[default]
    Balanced,
    Dps,
    AddClear,
    Support,
    Tank,
    Aggressive,
    AbilitySpam,
}

/// Explicit options supplied next to the request text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    pub locked_item_id: Option<ItemId>,
    /// Overrides any inventory phrasing in the text when set.
    pub use_inventory_only: Option<bool>,
    /// Overrides any activity named in the text when set.
    pub activity: Option<Activity>,
    pub include_alternatives: bool,
}

/// Structured reading of a build request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildIntent {
    pub target_class: ClassAffinity,
    /// `None` means any element.
    pub element: Option<DamageElement>,
    pub activity: Activity,
    pub playstyle: Playstyle,
    /// Ordered by first mention, no duplicates.
    pub priority_stats: Vec<StatChannel>,
    /// Targets exactly as written; not clamped.
    pub numeric_constraints: BTreeMap<StatChannel, u32>,
    pub weapon_types: Vec<WeaponType>,
    pub locked_items: Vec<ItemId>,
    pub use_inventory_only: bool,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
}

impl Default for BuildIntent {
    fn default() -> Self {
        Self {
            target_class: ClassAffinity::Any,
            element: None,
            activity: Activity::General,
            playstyle: Playstyle::Balanced,
            priority_stats: Vec::new(),
            numeric_constraints: BTreeMap::new(),
            weapon_types: Vec::new(),
            locked_items: Vec::new(),
            use_inventory_only: false,
            confidence: 0.5,
            matched_keywords: Vec::new(),
        }
    }
}

impl BuildIntent {
    /// Weight of a channel for piece scoring: the numeric target if one was
    /// given, otherwise `fallback`.
    pub fn weight_for(&self, channel: StatChannel, fallback: f64) -> f64 {
        self.numeric_constraints
            .get(&channel)
            .map_or(fallback, |&target| f64::from(target))
    }
}

static NUMERIC_CONSTRAINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d+)\s*(mobility|resilience|recovery|discipline|intellect|strength|mob|res|rec|disc|dis|int|str)\b",
    )
    .expect("valid regex")
});

fn stat_from_token(token: &str) -> Option<StatChannel> {
    match token.to_lowercase().as_str() {
        "mob" => Some(StatChannel::Mobility),
        "res" => Some(StatChannel::Resilience),
        "rec" => Some(StatChannel::Recovery),
        "dis" | "disc" => Some(StatChannel::Discipline),
        "int" => Some(StatChannel::Intellect),
        "str" => Some(StatChannel::Strength),
        other => StatChannel::from_str(other).ok(),
    }
}

/// Byte ranges already claimed by a locked item.
fn overlaps(claimed: &[(usize, usize)], start: usize, end: usize) -> bool {
    claimed.iter().any(|&(s, e)| start < e && s < end)
}

fn is_word_edge(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.map_or(true, |c| !c.is_alphanumeric()) && after.map_or(true, |c| !c.is_alphanumeric())
}

/// Shortest item name considered for locking.
const MIN_LOCK_NAME_LEN: usize = 4;

/// Parser bound to a catalog's item names.
///
/// # Examples
///
/// ```rust
/// use buildsmith::catalog::CatalogIndex;
/// use buildsmith::intent::{Activity, IntentParser, RequestOptions};
/// use buildsmith::{ItemDefinition, ItemKind, StatChannel};
///
/// let catalog = CatalogIndex::from_items(vec![
///     ItemDefinition::new("gjallarhorn", "Gjallarhorn", ItemKind::Weapon),
/// ])
/// .unwrap();
/// let parser = IntentParser::new(&catalog);
///
/// let intent = parser.parse("Raid build with Gjallarhorn and 100 recovery", &RequestOptions::default());
/// assert_eq!(intent.activity, Activity::Raid);
/// assert_eq!(intent.numeric_constraints[&StatChannel::Recovery], 100);
/// assert_eq!(intent.locked_items[0].as_str(), "gjallarhorn");
/// ```
#[derive(Debug, Clone)]
pub struct IntentParser {
    item_names: Vec<(String, ItemId)>,
}

impl IntentParser {
    pub fn new(catalog: &CatalogIndex) -> Self {
        Self {
            item_names: catalog
                .names_longest_first()
                .into_iter()
                .filter(|(name, _)| name.len() >= MIN_LOCK_NAME_LEN)
                .collect(),
        }
    }

    /// Parse `text`, then apply explicit `options` on top.
    pub fn parse(&self, text: &str, options: &RequestOptions) -> BuildIntent {
        let lower = text.to_lowercase();
        let mut intent = BuildIntent::default();

        let hits = scan(&lower);
        let mut class = None;
        let mut activity = None;
        let mut element = None;
        let mut playstyle = None;
        let mut stat_mentions: Vec<(usize, StatChannel)> = Vec::new();

        for hit in &hits {
            if !intent.matched_keywords.iter().any(|k| k == hit.keyword) {
                intent.matched_keywords.push(hit.keyword.to_string());
            }
            // hits are in text order, so the first match of a field wins
            match hit.target {
                KeywordTarget::Class(c) => {
                    class.get_or_insert(c);
                }
                KeywordTarget::Activity(a) => {
                    activity.get_or_insert(a);
                }
                KeywordTarget::Element(e) => {
                    element.get_or_insert(e);
                }
                KeywordTarget::Playstyle(p) => {
                    playstyle.get_or_insert(p);
                }
                KeywordTarget::Weapon(w) => {
                    if !intent.weapon_types.contains(&w) {
                        intent.weapon_types.push(w);
                    }
                }
                KeywordTarget::Stat(ch) => stat_mentions.push((hit.start, ch)),
                KeywordTarget::InventoryOnly => intent.use_inventory_only = true,
            }
        }

        for caps in NUMERIC_CONSTRAINT.captures_iter(&lower) {
            let (Some(whole), Some(value), Some(stat)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            let Some(channel) = stat_from_token(stat.as_str()) else {
                continue;
            };
            // Digits only, so the one failure is overflow.
            let value = value.as_str().parse::<u32>().unwrap_or(u32::MAX);
            intent.numeric_constraints.entry(channel).or_insert(value);
            stat_mentions.push((whole.start(), channel));
        }

        stat_mentions.sort_by_key(|&(pos, _)| pos);
        for (_, channel) in stat_mentions {
            if !intent.priority_stats.contains(&channel) {
                intent.priority_stats.push(channel);
            }
        }

        intent.target_class = class.unwrap_or_default();
        intent.activity = activity.unwrap_or_default();
        intent.element = element;
        intent.playstyle = playstyle.unwrap_or_default();
        intent.locked_items = self.locked_items(&lower);

        intent.confidence = confidence(&lower, intent.matched_keywords.len());

        if let Some(activity) = options.activity {
            intent.activity = activity;
        }
        if let Some(inventory_only) = options.use_inventory_only {
            intent.use_inventory_only = inventory_only;
        }
        if let Some(id) = &options.locked_item_id {
            if !intent.locked_items.contains(id) {
                intent.locked_items.push(id.clone());
            }
        }

        tracing::debug!(
            activity = %intent.activity,
            playstyle = %intent.playstyle,
            class = %intent.target_class,
            confidence = intent.confidence,
            keywords = intent.matched_keywords.len(),
            "intent parsed"
        );
        intent
    }

    /// Catalog item names in the text, longest match first.
    fn locked_items(&self, lower: &str) -> Vec<ItemId> {
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut found: Vec<(usize, ItemId)> = Vec::new();

        for (name, id) in &self.item_names {
            let hit = lower.match_indices(name.as_str()).find(|&(start, _)| {
                let end = start + name.len();
                is_word_edge(lower, start, end) && !overlaps(&claimed, start, end)
            });
            if let Some((start, _)) = hit {
                claimed.push((start, start + name.len()));
                if !found.iter().any(|(_, f)| f == id) {
                    found.push((start, id.clone()));
                }
            }
        }

        found.sort_by_key(|&(pos, _)| pos);
        found.into_iter().map(|(_, id)| id).collect()
    }
}

/// Confidence from keyword hits, phrasing and length, clamped to `[0, 1]`.
fn confidence(lower: &str, distinct_hits: usize) -> f64 {
    let mut score = 0.5 + (0.06 * distinct_hits as f64).min(0.3);
    if REQUEST_PHRASES.iter().any(|p| lower.contains(p)) {
        score += 0.1;
    }
    let len = lower.trim().chars().count();
    if len < 10 {
        score -= 0.2;
    }
    if len > 200 {
        score -= 0.1;
    }
    score.clamp(0.0, 1.0)
}
