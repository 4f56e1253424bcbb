//! Keyword tables and the scanner that finds them in request text.

use super::{Activity, Playstyle};
use crate::catalog::{ClassAffinity, DamageElement, WeaponType};
use crate::stats::StatChannel;

/// What a keyword tells us about the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordTarget {
    Class(ClassAffinity),
    Activity(Activity),
    Element(DamageElement),
    Playstyle(Playstyle),
    Weapon(WeaponType),
    Stat(StatChannel),
    InventoryOnly,
}

use KeywordTarget as K;

/// Every recognized phrase, lower case.
pub const KEYWORDS: &[(&str, KeywordTarget)] = &[
    // classes
    ("titan", K::Class(ClassAffinity::Titan)),
    ("hunter", K::Class(ClassAffinity::Hunter)),
    ("warlock", K::Class(ClassAffinity::Warlock)),
    // activities
    ("raid", K::Activity(Activity::Raid)),
    ("dungeon", K::Activity(Activity::Dungeon)),
    ("nightfall", K::Activity(Activity::Nightfall)),
    ("grandmaster", K::Activity(Activity::Nightfall)),
    ("strike", K::Activity(Activity::Strike)),
    ("vanguard", K::Activity(Activity::Strike)),
    ("crucible", K::Activity(Activity::Crucible)),
    ("pvp", K::Activity(Activity::Crucible)),
    ("trials", K::Activity(Activity::Trials)),
    ("osiris", K::Activity(Activity::Trials)),
    ("gambit", K::Activity(Activity::Gambit)),
    ("solo", K::Activity(Activity::Solo)),
    // elements
    ("solar", K::Element(DamageElement::Solar)),
    ("arc", K::Element(DamageElement::Arc)),
    ("void", K::Element(DamageElement::Void)),
    ("stasis", K::Element(DamageElement::Stasis)),
    ("strand", K::Element(DamageElement::Strand)),
    // playstyles
    ("dps", K::Playstyle(Playstyle::Dps)),
    ("boss damage", K::Playstyle(Playstyle::Dps)),
    ("damage phase", K::Playstyle(Playstyle::Dps)),
    ("add clear", K::Playstyle(Playstyle::AddClear)),
    ("add-clear", K::Playstyle(Playstyle::AddClear)),
    ("crowd control", K::Playstyle(Playstyle::AddClear)),
    ("support", K::Playstyle(Playstyle::Support)),
    ("healer", K::Playstyle(Playstyle::Support)),
    ("healing", K::Playstyle(Playstyle::Support)),
    ("tank", K::Playstyle(Playstyle::Tank)),
    ("survivab", K::Playstyle(Playstyle::Tank)),
    ("aggressive", K::Playstyle(Playstyle::Aggressive)),
    ("aggro", K::Playstyle(Playstyle::Aggressive)),
    ("rush", K::Playstyle(Playstyle::Aggressive)),
    ("ability spam", K::Playstyle(Playstyle::AbilitySpam)),
    ("ability uptime", K::Playstyle(Playstyle::AbilitySpam)),
    ("abilities", K::Playstyle(Playstyle::AbilitySpam)),
    ("balanced", K::Playstyle(Playstyle::Balanced)),
    // weapon types
    ("auto rifle", K::Weapon(WeaponType::AutoRifle)),
    ("scout rifle", K::Weapon(WeaponType::ScoutRifle)),
    ("pulse rifle", K::Weapon(WeaponType::PulseRifle)),
    ("hand cannon", K::Weapon(WeaponType::HandCannon)),
    ("sidearm", K::Weapon(WeaponType::Sidearm)),
    ("submachine gun", K::Weapon(WeaponType::SubmachineGun)),
    ("smg", K::Weapon(WeaponType::SubmachineGun)),
    ("bow", K::Weapon(WeaponType::Bow)),
    ("shotgun", K::Weapon(WeaponType::Shotgun)),
    ("sniper", K::Weapon(WeaponType::SniperRifle)),
    ("linear fusion", K::Weapon(WeaponType::LinearFusionRifle)),
    ("fusion rifle", K::Weapon(WeaponType::FusionRifle)),
    ("trace rifle", K::Weapon(WeaponType::TraceRifle)),
    ("grenade launcher", K::Weapon(WeaponType::GrenadeLauncher)),
    ("rocket launcher", K::Weapon(WeaponType::RocketLauncher)),
    ("rocket", K::Weapon(WeaponType::RocketLauncher)),
    ("machine gun", K::Weapon(WeaponType::MachineGun)),
    ("lmg", K::Weapon(WeaponType::MachineGun)),
    ("sword", K::Weapon(WeaponType::Sword)),
    ("glaive", K::Weapon(WeaponType::Glaive)),
    // stats and their aliases
    ("mobility", K::Stat(StatChannel::Mobility)),
    ("movement", K::Stat(StatChannel::Mobility)),
    ("resilience", K::Stat(StatChannel::Resilience)),
    ("damage resistance", K::Stat(StatChannel::Resilience)),
    ("recovery", K::Stat(StatChannel::Recovery)),
    ("regen", K::Stat(StatChannel::Recovery)),
    ("health", K::Stat(StatChannel::Recovery)),
    ("discipline", K::Stat(StatChannel::Discipline)),
    ("grenade", K::Stat(StatChannel::Discipline)),
    ("intellect", K::Stat(StatChannel::Intellect)),
    ("super", K::Stat(StatChannel::Intellect)),
    ("strength", K::Stat(StatChannel::Strength)),
    ("melee", K::Stat(StatChannel::Strength)),
    // inventory restriction
    ("my inventory", K::InventoryOnly),
    ("my vault", K::InventoryOnly),
    ("only what i own", K::InventoryOnly),
    ("only what i have", K::InventoryOnly),
    ("gear i own", K::InventoryOnly),
    ("items i own", K::InventoryOnly),
];

/// Keywords that match any word they start ("survivability", "regeneration").
const STEMS: &[&str] = &["survivab", "regen"];

/// Suffixes a whole-word keyword may run into.
const PLURAL_SUFFIXES: &[&str] = &["", "s", "es"];

/// Phrases that mark the text as an actual build request.
pub const REQUEST_PHRASES: &[&str] = &[
    "build", "loadout", "setup", "recommend", "optimi", "best", "suggest",
];

/// A keyword found in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordHit {
    pub keyword: &'static str,
    /// Byte offset in the lower-cased text.
    pub start: usize,
    pub target: KeywordTarget,
}

/// Whether a match at `start` begins a word.
fn starts_word(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

/// Whether the word continuing past `end` is a plural of `keyword`.
fn ends_word(text: &str, end: usize, keyword: &str) -> bool {
    if STEMS.contains(&keyword) {
        return true;
    }
    let rest = &text[end..];
    let suffix_len = rest
        .char_indices()
        .find(|(_, c)| !c.is_alphanumeric())
        .map_or(rest.len(), |(i, _)| i);
    PLURAL_SUFFIXES.contains(&&rest[..suffix_len])
}

/// Find keywords in lower-cased `text`.
///
/// Longer keywords are matched first and claim their byte range, so
/// "grenade launcher" is a weapon type and not also a discipline mention.
/// Keywords must begin a word and end it, allowing a plural suffix
/// ("raids"); stems match any word they start. Results are ordered by
/// position.
pub fn scan(text: &str) -> Vec<KeywordHit> {
    let mut ordered: Vec<&(&'static str, KeywordTarget)> = KEYWORDS.iter().collect();
    ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut claimed: Vec<(usize, usize)> = Vec::new();
    let mut hits = Vec::new();

    for &(keyword, target) in ordered {
        for (start, _) in text.match_indices(keyword) {
            let end = start + keyword.len();
            if !starts_word(text, start) || !ends_word(text, end, keyword) {
                continue;
            }
            if claimed.iter().any(|&(s, e)| start < e && s < end) {
                continue;
            }
            claimed.push((start, end));
            hits.push(KeywordHit {
                keyword,
                start,
                target,
            });
        }
    }

    hits.sort_by_key(|h| h.start);
    hits
}
