//! Activity profiles: the stat floors each activity expects.

use crate::catalog::{ItemDefinition, ItemKind};
use crate::intent::Activity;
use crate::stats::{StatChannel, StatTotals};
use crate::weapon::{weapon_activity_fit, WeaponProfile, NEUTRAL_FIT};
use serde::{Deserialize, Serialize};

/// Minimum stat values recommended for an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityProfile {
    pub activity: Activity,
    #[serde(default)]
    pub description: String,
    pub thresholds: Vec<(StatChannel, u32)>,
}

/// Thresholds for `activity`; empty when the activity has no profile.
pub fn thresholds_for(profiles: &[ActivityProfile], activity: Activity) -> &[(StatChannel, u32)] {
    profiles
        .iter()
        .find(|p| p.activity == activity)
        .map_or(&[], |p| p.thresholds.as_slice())
}

/// Mean of `min(1, actual / required)` over the thresholds, as 0–100.
///
/// An activity without thresholds fits any build fully.
pub fn threshold_fit(thresholds: &[(StatChannel, u32)], totals: &StatTotals) -> f64 {
    let ratios: Vec<f64> = thresholds
        .iter()
        .map(|&(ch, required)| {
            if required == 0 {
                1.0
            } else {
                (f64::from(totals.get(ch)) / f64::from(required)).min(1.0)
            }
        })
        .collect();
    if ratios.is_empty() {
        return 100.0;
    }
    ratios.iter().sum::<f64>() / ratios.len() as f64 * 100.0
}

/// Thresholds the totals fall short of, with the shortfall.
pub fn unmet_thresholds(
    thresholds: &[(StatChannel, u32)],
    totals: &StatTotals,
) -> Vec<(StatChannel, u32, u32)> {
    thresholds
        .iter()
        .filter(|&&(ch, required)| totals.get(ch) < required)
        .map(|&(ch, required)| (ch, required, totals.get(ch)))
        .collect()
}

/// How well a single item suits an activity (0–1).
///
/// Weapons use their profile. Armor counts the share of its positive stat
/// points that land on channels the activity asks for.
pub fn item_activity_fit(
    item: &ItemDefinition,
    activity: Activity,
    activities: &[ActivityProfile],
    weapons: &[WeaponProfile],
) -> f64 {
    match item.kind {
        ItemKind::Weapon => weapon_activity_fit(weapons, item, activity),
        _ => {
            let wanted = thresholds_for(activities, activity);
            let positive: i32 = item.stat_contributions.values().filter(|&&v| v > 0).sum();
            if wanted.is_empty() || positive <= 0 {
                return NEUTRAL_FIT;
            }
            let on_target: i32 = item
                .stat_contributions
                .iter()
                .filter(|(ch, v)| **v > 0 && wanted.iter().any(|(w, _)| w == *ch))
                .map(|(_, v)| *v)
                .sum();
            f64::from(on_target) / f64::from(positive)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles() -> Vec<ActivityProfile> {
        vec![ActivityProfile {
            activity: Activity::Raid,
            description: String::new(),
            thresholds: vec![(StatChannel::Resilience, 100), (StatChannel::Recovery, 50)],
        }]
    }

    fn totals(res: u32, rec: u32) -> StatTotals {
        let mut t = StatTotals::default();
        t.set(StatChannel::Resilience, res);
        t.set(StatChannel::Recovery, rec);
        t
    }

    #[test]
    fn test_threshold_fit() {
        let p = profiles();
        let raid = thresholds_for(&p, Activity::Raid);
        // (0.5 + 1.0) / 2
        assert!((threshold_fit(raid, &totals(50, 80)) - 75.0).abs() < 1e-9);
        assert_eq!(threshold_fit(raid, &totals(120, 60)), 100.0);
    }

    #[test]
    fn test_no_profile_fits_fully() {
        let p = profiles();
        let general = thresholds_for(&p, Activity::General);
        assert!(general.is_empty());
        assert_eq!(threshold_fit(general, &StatTotals::default()), 100.0);
    }

    #[test]
    fn test_unmet_thresholds() {
        let p = profiles();
        let unmet = unmet_thresholds(thresholds_for(&p, Activity::Raid), &totals(40, 50));
        assert_eq!(unmet, vec![(StatChannel::Resilience, 100, 40)]);
    }

    #[test]
    fn test_armor_activity_fit() {
        let helm = ItemDefinition::new("h", "H", ItemKind::Armor)
            .with_stat(StatChannel::Resilience, 30)
            .with_stat(StatChannel::Strength, 10);
        let fit = item_activity_fit(&helm, Activity::Raid, &profiles(), &[]);
        assert!((fit - 0.75).abs() < 1e-9);

        let bare = ItemDefinition::new("b", "B", ItemKind::Armor);
        assert_eq!(item_activity_fit(&bare, Activity::Raid, &profiles(), &[]), NEUTRAL_FIT);
    }
}
