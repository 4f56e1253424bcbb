//! Engine configuration.
//!
//! Scoring weights, thresholds and selection caps, loaded from TOML. Every
//! field has a default, so a config file only needs the values it changes.

use crate::catalog::DamageElement;
use crate::error::EngineError;
use crate::intent::Activity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// One value per scoring axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisValues {
    pub stat_optimization: f64,
    pub synergy_strength: f64,
    pub activity_fit: f64,
    pub weapon_synergy: f64,
    pub armor_optimization: f64,
    pub exotic_utilization: f64,
}

impl AxisValues {
    pub const fn new(
        stat_optimization: f64,
        synergy_strength: f64,
        activity_fit: f64,
        weapon_synergy: f64,
        armor_optimization: f64,
        exotic_utilization: f64,
    ) -> Self {
        Self {
            stat_optimization,
            synergy_strength,
            activity_fit,
            weapon_synergy,
            armor_optimization,
            exotic_utilization,
        }
    }

    /// Values in axis order.
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.stat_optimization,
            self.synergy_strength,
            self.activity_fit,
            self.weapon_synergy,
            self.armor_optimization,
            self.exotic_utilization,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Default axis weights.
pub const DEFAULT_WEIGHTS: AxisValues = AxisValues::new(25.0, 25.0, 20.0, 15.0, 10.0, 5.0);

impl Default for AxisValues {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

/// Score below which an axis produces a recommendation.
///
/// Kept apart from [`AxisValues`] so a partial `[thresholds]` table fills
/// its gaps with threshold defaults rather than weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub stat_optimization: f64,
    pub synergy_strength: f64,
    pub activity_fit: f64,
    pub weapon_synergy: f64,
    pub armor_optimization: f64,
    pub exotic_utilization: f64,
}

impl Thresholds {
    pub fn as_axes(&self) -> AxisValues {
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

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            stat_optimization: 70.0,
            synergy_strength: 60.0,
            activity_fit: 70.0,
            weapon_synergy: 60.0,
            armor_optimization: 60.0,
            exotic_utilization: 50.0,
        }
    }
}

/// Per-category mod limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModCaps {
    pub stat: usize,
    pub combat: usize,
}

impl Default for ModCaps {
    fn default() -> Self {
        Self { stat: 5, combat: 4 }
    }
}

/// Subclass component limits. A subclass always has exactly one super.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubclassCaps {
    pub aspects: usize,
    pub fragments: usize,
}

impl Default for SubclassCaps {
    fn default() -> Self {
        Self {
            aspects: 2,
            fragments: 4,
        }
    }
}

/// Tunable engine parameters.
///
/// # Examples
///
/// ```rust
/// use buildsmith::config::EngineConfig;
/// use buildsmith::intent::Activity;
///
/// let config = EngineConfig::from_toml_str(r#"
///     alternative_count = 1
///
///     [activity_weights.crucible]
///     weapon_synergy = 40.0
/// "#).unwrap();
///
/// assert_eq!(config.alternative_count, 1);
/// assert_eq!(config.weights_for(Activity::Crucible).weapon_synergy, 40.0);
/// assert_eq!(config.weights_for(Activity::Strike).weapon_synergy, 15.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Axis weights used when no activity override applies.
    pub weights: AxisValues,
    /// Overrides keyed by activity name.
    pub activity_weights: BTreeMap<String, AxisValues>,
    /// Axes scoring below these produce recommendations.
    pub thresholds: Thresholds,
    /// Axes scoring at or above this are reported as strengths.
    pub strength_threshold: f64,
    /// Intents below this confidence carry a diagnostic.
    pub low_confidence_threshold: f64,
    pub mod_caps: ModCaps,
    pub subclass_caps: SubclassCaps,
    /// Element picked when subclass scores tie.
    pub canonical_element: DamageElement,
    /// Alternative builds produced on request.
    pub alternative_count: usize,
    /// Runner-up candidates kept per slot on request.
    pub runner_up_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut activity_weights = BTreeMap::new();
        activity_weights.insert(
            Activity::Raid.to_string(),
            AxisValues::new(20.0, 30.0, 25.0, 15.0, 5.0, 5.0),
        );
        activity_weights.insert(
            Activity::Crucible.to_string(),
            AxisValues::new(20.0, 15.0, 20.0, 30.0, 10.0, 5.0),
        );

        Self {
            weights: DEFAULT_WEIGHTS,
            activity_weights,
            thresholds: Thresholds::default(),
            strength_threshold: 80.0,
            low_confidence_threshold: 0.5,
            mod_caps: ModCaps::default(),
            subclass_caps: SubclassCaps::default(),
            canonical_element: DamageElement::Solar,
            alternative_count: 2,
            runner_up_count: 3,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML config.
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            toml::from_str(text).map_err(|e| EngineError::parse("engine config", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config from disk.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = crate::content::read_file(path)?;
        Self::from_toml_str(&text)
    }

    /// Check names and ranges that serde cannot.
    pub fn validate(&self) -> Result<(), EngineError> {
        check_weights("weights", &self.weights)?;
        for (name, weights) in &self.activity_weights {
            Activity::from_str(name).map_err(|_| {
                EngineError::Configuration(format!("unknown activity `{name}` in activity_weights"))
            })?;
            check_weights(name, weights)?;
        }
        if self
            .thresholds
            .as_axes()
            .as_array()
            .iter()
            .any(|t| !(0.0..=100.0).contains(t))
        {
            return Err(EngineError::Configuration(
                "thresholds must lie in 0..=100".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.strength_threshold) {
            return Err(EngineError::Configuration(
                "strength_threshold must lie in 0..=100".to_string(),
            ));
        }
        if !self.canonical_element.is_subclass_element() {
            return Err(EngineError::Configuration(format!(
                "canonical_element `{}` is not a subclass element",
                self.canonical_element
            )));
        }
        Ok(())
    }

    /// Axis weights for `activity`.
    pub fn weights_for(&self, activity: Activity) -> &AxisValues {
        self.activity_weights
            .iter()
            .find(|(name, _)| Activity::from_str(name).ok() == Some(activity))
            .map_or(&self.weights, |(_, weights)| weights)
    }
}

fn check_weights(name: &str, weights: &AxisValues) -> Result<(), EngineError> {
    let values = weights.as_array();
    if values.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(EngineError::Configuration(format!(
            "`{name}` weights must be finite and non-negative"
        )));
    }
    if weights.sum() <= 0.0 {
        return Err(EngineError::Configuration(format!(
            "`{name}` weights must not all be zero"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.weights.sum(), 100.0);
        assert_eq!(config.mod_caps, ModCaps { stat: 5, combat: 4 });
        assert_eq!(config.canonical_element, DamageElement::Solar);
    }

    #[test]
    fn test_raid_override() {
        let config = EngineConfig::default();
        let raid = config.weights_for(Activity::Raid);
        assert_eq!(raid.synergy_strength, 30.0);
        assert_eq!(config.weights_for(Activity::General), &DEFAULT_WEIGHTS);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config.strength_threshold, 80.0);
        assert_eq!(config.subclass_caps.fragments, 4);
    }

    #[test]
    fn test_partial_axis_table_keeps_other_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [weights]
            exotic_utilization = 10.0
            "#,
        )
        .unwrap();
        assert_eq!(config.weights.exotic_utilization, 10.0);
        assert_eq!(config.weights.stat_optimization, 25.0);
    }

    #[test]
    fn test_partial_thresholds_keep_threshold_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [thresholds]
            synergy_strength = 40.0
            "#,
        )
        .unwrap();
        assert_eq!(config.thresholds.synergy_strength, 40.0);
        assert_eq!(config.thresholds.stat_optimization, 70.0);
    }

    #[test]
    fn test_unknown_activity_rejected() {
        let err = EngineConfig::from_toml_str(
            r#"
            [activity_weights.karaoke]
            stat_optimization = 10.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Configuration(_)));
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(EngineConfig::from_toml_str("strength_threshold = 150.0").is_err());
        assert!(EngineConfig::from_toml_str("canonical_element = \"kinetic\"").is_err());
        assert!(EngineConfig::from_toml_str(
            r#"
            [weights]
            stat_optimization = 0.0
            synergy_strength = 0.0
            activity_fit = 0.0
            weapon_synergy = 0.0
            armor_optimization = 0.0
            exotic_utilization = 0.0
            "#
        )
        .is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = EngineConfig::from_toml_str("weights = [").unwrap_err();
        assert!(matches!(err, EngineError::Parse { .. }));
    }
}
