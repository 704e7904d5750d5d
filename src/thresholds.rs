//! Threshold configuration.
//!
//! Four boundaries split the value axis into five zones:
//!
//! ```text
//!   red  | orange |     green     | orange |  red
//! -------lt-------lb--------------ub-------ut------->
//! ```
//!
//! Each boundary is inclusive to the band on its right.

use serde::{Deserialize, Serialize};

use crate::error::ThresholdError;

pub const DEFAULT_LOWER_THRESHOLD: f64 = 20.0;
pub const DEFAULT_LOWER_BOUND: f64 = 50.0;
pub const DEFAULT_UPPER_BOUND: f64 = 100.0;
pub const DEFAULT_UPPER_THRESHOLD: f64 = 150.0;

/// Partially specified thresholds, as they arrive from a config file, a
/// form or a command line. Any field left `None` falls back to its own
/// default when resolved; the other fields are unaffected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThresholdConfig {
    #[serde(alias = "lower_threshold", skip_serializing_if = "Option::is_none")]
    pub lower_threshold: Option<f64>,
    #[serde(alias = "lower_bound", skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    #[serde(alias = "upper_bound", skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    #[serde(alias = "upper_threshold", skip_serializing_if = "Option::is_none")]
    pub upper_threshold: Option<f64>,
}

impl ThresholdConfig {
    /// Fills every missing field from the defaults, field by field.
    pub fn resolve(&self) -> Thresholds {
        let defaults = Thresholds::default();
        Thresholds {
            lower_threshold: self.lower_threshold.unwrap_or(defaults.lower_threshold),
            lower_bound: self.lower_bound.unwrap_or(defaults.lower_bound),
            upper_bound: self.upper_bound.unwrap_or(defaults.upper_bound),
            upper_threshold: self.upper_threshold.unwrap_or(defaults.upper_threshold),
        }
    }

    /// Layers `patch` on top of `self`: fields set in `patch` win, unset
    /// fields keep their current value.
    pub fn merge(&self, patch: &ThresholdConfig) -> ThresholdConfig {
        ThresholdConfig {
            lower_threshold: patch.lower_threshold.or(self.lower_threshold),
            lower_bound: patch.lower_bound.or(self.lower_bound),
            upper_bound: patch.upper_bound.or(self.upper_bound),
            upper_threshold: patch.upper_threshold.or(self.upper_threshold),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ThresholdConfig::default()
    }
}

impl From<Thresholds> for ThresholdConfig {
    fn from(t: Thresholds) -> Self {
        Self {
            lower_threshold: Some(t.lower_threshold),
            lower_bound: Some(t.lower_bound),
            upper_bound: Some(t.upper_bound),
            upper_threshold: Some(t.upper_threshold),
        }
    }
}

/// Fully resolved thresholds. Ordering `lower_threshold < lower_bound <
/// upper_bound < upper_threshold` is intended but not required; see
/// [`Thresholds::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub lower_threshold: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub upper_threshold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            lower_threshold: DEFAULT_LOWER_THRESHOLD,
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            upper_threshold: DEFAULT_UPPER_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub fn from_config(config: Option<&ThresholdConfig>) -> Self {
        config.map(ThresholdConfig::resolve).unwrap_or_default()
    }

    /// Form-level checks run before a threshold edit is accepted.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for (field, value) in [
            ("lowerThreshold", self.lower_threshold),
            ("lowerBound", self.lower_bound),
            ("upperBound", self.upper_bound),
            ("upperThreshold", self.upper_threshold),
        ] {
            if !value.is_finite() {
                return Err(ThresholdError::NotFinite { field, value });
            }
        }

        if self.lower_threshold >= self.lower_bound {
            return Err(ThresholdError::LowerThresholdAboveBound);
        }
        if self.lower_bound >= self.upper_bound {
            return Err(ThresholdError::BoundsInverted);
        }
        if self.upper_bound >= self.upper_threshold {
            return Err(ThresholdError::UpperBoundAboveThreshold);
        }
        Ok(())
    }
}
