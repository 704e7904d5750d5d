use std::path::PathBuf;

/// Rejected threshold edits. The classifier itself accepts any ordering;
/// these checks belong to whoever collects the numbers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("Please enter valid numeric values for all thresholds ({field} = {value})")]
    NotFinite { field: &'static str, value: f64 },
    #[error("Lower threshold must be less than lower bound")]
    LowerThresholdAboveBound,
    #[error("Lower bound must be less than upper bound")]
    BoundsInverted,
    #[error("Upper bound must be less than upper threshold")]
    UpperBoundAboveThreshold,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("Please select a date")]
    MissingDate,
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Please enter a valid numeric value (got '{0}')")]
    InvalidValue(String),
    #[error("value must not be negative (got {0})")]
    NegativeValue(f64),
    #[error("no record with id {0}")]
    UnknownId(crate::models::RecordId),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
