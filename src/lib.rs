//! Classification, filtering and aggregation of dated health readings.
//!
//! A reading is classified against four thresholds into `red`, `orange`
//! or `green`. [`filter::filter_records`] narrows a record set by date
//! range and enabled categories, and [`stats::compute_stats`] summarizes
//! it. [`state::HealthState`] owns one session's records, filter and
//! thresholds and exposes the derived views.

pub mod chart;
pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod import;
pub mod models;
pub mod report;
pub mod state;
pub mod stats;
pub mod thresholds;

pub use classify::{classify, classify_value, Zone};
pub use filter::{filter_records, FilterSpec};
pub use models::{Category, Record, RecordId, Stats};
pub use state::{Command, HealthState};
pub use stats::compute_stats;
pub use thresholds::{ThresholdConfig, Thresholds};
