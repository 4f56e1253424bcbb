//! Content tables loaded from RON.
//!
//! The crate embeds a copy of every table. A data directory can replace
//! any of them:
//!
//! ```text
//! data_dir/
//! ├── rules.ron
//! ├── archetypes.ron
//! ├── weapons.ron
//! ├── activities.ron
//! └── mods.ron
//! ```
//!
//! Files missing from the directory fall back to the embedded copy.

use crate::activity::ActivityProfile;
use crate::archetype::Archetype;
use crate::error::EngineError;
use crate::mods::ModRule;
use crate::rules::{RuleBase, BUILTIN_RULES};
use crate::weapon::WeaponProfile;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::path::Path;

const BUILTIN_ARCHETYPES: &str = include_str!("../data/archetypes.ron");
const BUILTIN_WEAPONS: &str = include_str!("../data/weapons.ron");
const BUILTIN_ACTIVITIES: &str = include_str!("../data/activities.ron");
const BUILTIN_MODS: &str = include_str!("../data/mods.ron");

/// Read a data file to a string.
pub(crate) fn read_file(path: &Path) -> Result<String, EngineError> {
    std::fs::read_to_string(path).map_err(|e| EngineError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn parse_ron<T: DeserializeOwned>(what: &str, text: &str) -> Result<T, EngineError> {
    ron::from_str(text).map_err(|e| EngineError::parse(what, e))
}

fn check_unique(table: &str, ids: impl Iterator<Item = String>) -> Result<(), EngineError> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for id in ids {
        if !seen.insert(id.clone()) {
            duplicates.insert(id);
        }
    }
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(EngineError::DuplicateIds {
            table: table.to_string(),
            ids: duplicates.into_iter().collect(),
        })
    }
}

/// RON text of each table, before parsing.
#[derive(Debug, Clone, Copy)]
pub struct ContentSources<'a> {
    pub rules: &'a str,
    pub archetypes: &'a str,
    pub weapons: &'a str,
    pub activities: &'a str,
    pub mods: &'a str,
}

impl Default for ContentSources<'static> {
    fn default() -> Self {
        Self {
            rules: BUILTIN_RULES,
            archetypes: BUILTIN_ARCHETYPES,
            weapons: BUILTIN_WEAPONS,
            activities: BUILTIN_ACTIVITIES,
            mods: BUILTIN_MODS,
        }
    }
}

/// Every declarative table the engine reads.
///
/// # Examples
///
/// ```rust
/// use buildsmith::content::ContentTables;
/// use buildsmith::intent::Activity;
///
/// let content = ContentTables::builtin().unwrap();
/// assert!(!content.archetypes.is_empty());
/// assert!(content.activities.iter().any(|a| a.activity == Activity::Raid));
/// ```
#[derive(Debug, Clone)]
pub struct ContentTables {
    pub rules: RuleBase,
    pub archetypes: Vec<Archetype>,
    pub weapons: Vec<WeaponProfile>,
    pub activities: Vec<ActivityProfile>,
    pub mods: Vec<ModRule>,
}

impl ContentTables {
    /// The tables embedded in the crate.
    pub fn builtin() -> Result<Self, EngineError> {
        Self::from_sources(ContentSources::default())
    }

    /// Parse and validate every table.
    pub fn from_sources(sources: ContentSources<'_>) -> Result<Self, EngineError> {
        let rules = RuleBase::from_ron_str(sources.rules)?;
        let archetypes: Vec<Archetype> = parse_ron("archetypes", sources.archetypes)?;
        let weapons: Vec<WeaponProfile> = parse_ron("weapon profiles", sources.weapons)?;
        let activities: Vec<ActivityProfile> = parse_ron("activity profiles", sources.activities)?;
        let mods: Vec<ModRule> = parse_ron("mod rules", sources.mods)?;

        if archetypes.is_empty() {
            return Err(EngineError::Configuration(
                "at least one archetype is required".to_string(),
            ));
        }
        if let Some(a) = archetypes.iter().find(|a| a.primary.is_empty()) {
            return Err(EngineError::Configuration(format!(
                "archetype `{}` has no primary channels",
                a.name
            )));
        }
        check_unique("archetypes", archetypes.iter().map(|a| a.name.clone()))?;
        check_unique("weapons", weapons.iter().map(|w| w.weapon_type.to_string()))?;
        check_unique("activities", activities.iter().map(|a| a.activity.to_string()))?;
        check_unique("mods", mods.iter().map(|m| m.id.clone()))?;
        if let Some(m) = mods.iter().find(|m| !m.weight.is_finite()) {
            return Err(EngineError::Configuration(format!(
                "mod rule `{}` has a non-finite weight",
                m.id
            )));
        }

        tracing::debug!(
            archetypes = archetypes.len(),
            weapons = weapons.len(),
            activities = activities.len(),
            mods = mods.len(),
            "content tables loaded"
        );

        Ok(Self {
            rules,
            archetypes,
            weapons,
            activities,
            mods,
        })
    }

    /// Load tables from a directory, falling back to the embedded copy for
    /// any file that is absent.
    pub fn load_dir(dir: &Path) -> Result<Self, EngineError> {
        let read = |name: &str, builtin: &'static str| -> Result<String, EngineError> {
            let path = dir.join(name);
            if path.exists() {
                read_file(&path)
            } else {
                tracing::debug!(file = name, "using embedded table");
                Ok(builtin.to_string())
            }
        };
        let defaults = ContentSources::default();
        let rules = read("rules.ron", defaults.rules)?;
        let archetypes = read("archetypes.ron", defaults.archetypes)?;
        let weapons = read("weapons.ron", defaults.weapons)?;
        let activities = read("activities.ron", defaults.activities)?;
        let mods = read("mods.ron", defaults.mods)?;

        Self::from_sources(ContentSources {
            rules: &rules,
            archetypes: &archetypes,
            weapons: &weapons,
            activities: &activities,
            mods: &mods,
        })
    }
}
