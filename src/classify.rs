use serde::{Deserialize, Serialize};

use crate::models::Category;
use crate::thresholds::{ThresholdConfig, Thresholds};

/// Position of a value relative to the four boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Zone {
    CriticalLow,
    WarningLow,
    Normal,
    WarningHigh,
    CriticalHigh,
}

impl Zone {
    pub fn category(self) -> Category {
        match self {
            Zone::CriticalLow | Zone::CriticalHigh => Category::Red,
            Zone::WarningLow | Zone::WarningHigh => Category::Orange,
            Zone::Normal => Category::Green,
        }
    }
}

/// Locates `value` among the thresholds.
///
/// The outer (red) test runs before the inner (orange) one and nothing
/// assumes the boundaries are sorted, so misordered thresholds still give a
/// well-defined answer. NaN fails every comparison and lands in `Normal`.
pub fn zone(value: f64, thresholds: &Thresholds) -> Zone {
    if value < thresholds.lower_threshold || value >= thresholds.upper_threshold {
        if value < thresholds.lower_threshold {
            Zone::CriticalLow
        } else {
            Zone::CriticalHigh
        }
    } else if value < thresholds.lower_bound || value >= thresholds.upper_bound {
        if value < thresholds.lower_bound {
            Zone::WarningLow
        } else {
            Zone::WarningHigh
        }
    } else {
        Zone::Normal
    }
}

pub fn classify_value(value: f64, thresholds: &Thresholds) -> Category {
    zone(value, thresholds).category()
}

/// Classifies with an optional, possibly partial configuration. Missing
/// fields use their defaults.
pub fn classify(value: f64, config: Option<&ThresholdConfig>) -> Category {
    classify_value(value, &Thresholds::from_config(config))
}
