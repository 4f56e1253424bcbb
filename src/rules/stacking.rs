//! Effect stacking rules.
//!
//! Defines how several instances of the same effect combine. Magnitudes are
//! percentages: an instance of `25.0` means +25%.

use serde::{Deserialize, Serialize};

/// Tie-break used by [`StackingMode::Overwrite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwriteBy {
    Magnitude,
    Duration,
}

/// How multiple instances of an effect stack.
///
/// # Examples
///
/// ```rust
/// use buildsmith::rules::{stack, EffectInstance, StackingMode};
///
/// let instances = [EffectInstance::new(10.0, 5.0), EffectInstance::new(10.0, 5.0)];
///
/// let additive = stack(StackingMode::Additive, &instances);
/// assert_eq!(additive.value, 20.0);
///
/// let multiplicative = stack(StackingMode::Multiplicative, &instances);
/// assert!((multiplicative.value - 21.0).abs() < 1e-9); // 1.1 * 1.1 - 1
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackingMode {
    /// Magnitudes are summed.
    Additive,
    /// `∏(1 + v/100) − 1`, reported in percent.
    Multiplicative,
    /// Multiplicative, with the product fraction clamped to `cap`
    /// (`0.5` caps the combined bonus at +50%).
    MultiplicativeCapped { cap: f64 },
    /// Only the strongest instance applies.
    Overwrite { by: OverwriteBy },
}

/// One active instance of an effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    pub magnitude: f64,
    pub duration_secs: f64,
}

impl EffectInstance {
    pub fn new(magnitude: f64, duration_secs: f64) -> Self {
        Self {
            magnitude,
            duration_secs,
        }
    }
}

/// Result of stacking a group of instances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackOutcome {
    /// Combined magnitude, in percent.
    pub value: f64,
    /// Set when a declared cap reduced the result.
    pub capped_by_limit: bool,
}

/// Combine `instances` under `mode`.
///
/// An empty slice stacks to zero under every mode.
pub fn stack(mode: StackingMode, instances: &[EffectInstance]) -> StackOutcome {
    if instances.is_empty() {
        return StackOutcome {
            value: 0.0,
            capped_by_limit: false,
        };
    }

    match mode {
        StackingMode::Additive => StackOutcome {
            value: instances.iter().map(|i| i.magnitude).sum(),
            capped_by_limit: false,
        },
        StackingMode::Multiplicative => StackOutcome {
            value: product_fraction(instances) * 100.0,
            capped_by_limit: false,
        },
        StackingMode::MultiplicativeCapped { cap } => {
            let fraction = product_fraction(instances);
            let capped = fraction > cap;
            StackOutcome {
                value: fraction.min(cap) * 100.0,
                capped_by_limit: capped,
            }
        }
        StackingMode::Overwrite { by } => {
            let key = |i: &EffectInstance| match by {
                OverwriteBy::Magnitude => (i.magnitude, i.duration_secs),
                OverwriteBy::Duration => (i.duration_secs, i.magnitude),
            };
            let winner = instances
                .iter()
                .copied()
                .max_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(std::cmp::Ordering::Equal))
                .map(|i| i.magnitude)
                .unwrap_or(0.0);
            StackOutcome {
                value: winner,
                capped_by_limit: false,
            }
        }
    }
}

fn product_fraction(instances: &[EffectInstance]) -> f64 {
    instances
        .iter()
        .fold(1.0, |acc, i| acc * (1.0 + i.magnitude / 100.0))
        - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(magnitude: f64, duration_secs: f64) -> EffectInstance {
        EffectInstance::new(magnitude, duration_secs)
    }

    #[test]
    fn test_empty_stacks_to_zero() {
        let outcome = stack(StackingMode::Multiplicative, &[]);
        assert_eq!(outcome.value, 0.0);
        assert!(!outcome.capped_by_limit);
    }

    #[test]
    fn test_additive() {
        let outcome = stack(StackingMode::Additive, &[inst(15.0, 0.0), inst(25.0, 0.0)]);
        assert_eq!(outcome.value, 40.0);
    }

    #[test]
    fn test_multiplicative() {
        let outcome = stack(
            StackingMode::Multiplicative,
            &[inst(20.0, 0.0), inst(25.0, 0.0)],
        );
        // 1.2 * 1.25 = 1.5
        assert!((outcome.value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiplicative_capped() {
        let mode = StackingMode::MultiplicativeCapped { cap: 0.3 };

        let under = stack(mode, &[inst(10.0, 0.0), inst(10.0, 0.0)]);
        assert!((under.value - 21.0).abs() < 1e-9);
        assert!(!under.capped_by_limit);

        let over = stack(mode, &[inst(20.0, 0.0), inst(25.0, 0.0)]);
        assert!((over.value - 30.0).abs() < 1e-9);
        assert!(over.capped_by_limit);
    }

    #[test]
    fn test_overwrite_by_magnitude_and_duration() {
        let instances = [inst(30.0, 5.0), inst(20.0, 12.0)];

        let by_mag = stack(
            StackingMode::Overwrite {
                by: OverwriteBy::Magnitude,
            },
            &instances,
        );
        assert_eq!(by_mag.value, 30.0);

        let by_dur = stack(
            StackingMode::Overwrite {
                by: OverwriteBy::Duration,
            },
            &instances,
        );
        assert_eq!(by_dur.value, 20.0);
    }
}
