use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::classify::classify_value;
use crate::models::{Category, Record};
use crate::thresholds::Thresholds;

/// Date range and category toggles selected by the user.
///
/// `alert_types` with no `true` entry does not restrict categories at all:
/// an all-off toggle state reads the same as an untouched one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub alert_types: BTreeMap<Category, bool>,
}

impl FilterSpec {
    /// No date bounds, every category switched on.
    pub fn initial() -> Self {
        Self {
            start_date: None,
            end_date: None,
            alert_types: Category::ALL.iter().map(|c| (*c, true)).collect(),
        }
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Enables exactly the given categories.
    pub fn with_alert_types(mut self, enabled: &[Category]) -> Self {
        self.alert_types = Category::ALL
            .iter()
            .map(|c| (*c, enabled.contains(c)))
            .collect();
        self
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.alert_types.get(&category).copied().unwrap_or(false)
    }

    pub fn has_any_enabled(&self) -> bool {
        self.alert_types.values().any(|enabled| *enabled)
    }

    /// Unparseable record dates fail any bound that is set.
    pub fn matches_date(&self, record: &Record) -> bool {
        let date = record.parsed_date();
        let after_start = self
            .start_date
            .map_or(true, |start| date.is_some_and(|d| d >= start));
        let before_end = self
            .end_date
            .map_or(true, |end| date.is_some_and(|d| d <= end));
        after_start && before_end
    }

    pub fn matches_category(&self, category: Category) -> bool {
        !self.has_any_enabled() || self.is_enabled(category)
    }

    pub fn matches(&self, record: &Record, thresholds: &Thresholds) -> bool {
        self.matches_date(record) && self.matches_category(classify_value(record.value, thresholds))
    }

    pub fn describe(&self) -> String {
        let range = match (self.start_date, self.end_date) {
            (None, None) => "all dates".to_string(),
            (Some(start), None) => format!("from {start}"),
            (None, Some(end)) => format!("through {end}"),
            (Some(start), Some(end)) => format!("{start} to {end}"),
        };
        let categories = if self.has_any_enabled() {
            Category::ALL
                .iter()
                .filter(|c| self.is_enabled(**c))
                .map(|c| c.label())
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            "all alert types".to_string()
        };
        format!("{range}; {categories}")
    }
}

/// Returns the records that pass both the date range and the category
/// toggles, in their original order.
pub fn filter_records(records: &[Record], spec: &FilterSpec, thresholds: &Thresholds) -> Vec<Record> {
    let filtered: Vec<Record> = records
        .iter()
        .filter(|record| spec.matches(record, thresholds))
        .cloned()
        .collect();

    debug!(
        "filter kept {} of {} records ({})",
        filtered.len(),
        records.len(),
        spec.describe()
    );
    filtered
}
