use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::thresholds::ThresholdConfig;

/// Contents of a `health-metrics.toml` file. Every key is optional:
///
/// ```toml
/// [thresholds]
/// lower_threshold = 20
/// lower_bound = 50
/// upper_bound = 100
/// upper_threshold = 150
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub thresholds: ThresholdConfig,
}

pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(contents)?)
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents)?;
    debug!("loaded config from {}: {:?}", path.display(), config.thresholds);
    Ok(config)
}
