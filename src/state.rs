//! Session state: the record list, the active filter and the thresholds.
//!
//! Everything here is owned by a single [`HealthState`] value. The
//! classification, filtering and aggregation functions only ever see
//! borrowed snapshots of it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chart::{build_chart, ChartSeries};
use crate::error::RecordError;
use crate::filter::{filter_records, FilterSpec};
use crate::models::{parse_date, Category, Record, RecordId, Stats, DATE_FORMAT};
use crate::stats::compute_stats;
use crate::thresholds::{ThresholdConfig, Thresholds};

/// Shallow filter update. Fields left `None` are untouched; `Some(None)`
/// clears a date bound. A provided `alert_types` replaces the whole map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub alert_types: Option<BTreeMap<Category, bool>>,
}

/// Unvalidated form input for a new or edited record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDraft {
    pub id: Option<RecordId>,
    pub date: String,
    pub value: String,
}

impl RecordDraft {
    pub fn new(date: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: None,
            date: date.into(),
            value: value.into(),
        }
    }

    pub fn editing(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Checks the draft and normalizes its date. `fallback_id` is used
    /// when the draft carries no id of its own.
    pub fn validate(&self, fallback_id: RecordId) -> Result<Record, RecordError> {
        let raw_date = self.date.trim();
        if raw_date.is_empty() {
            return Err(RecordError::MissingDate);
        }
        let date =
            parse_date(raw_date).ok_or_else(|| RecordError::InvalidDate(raw_date.to_string()))?;

        let value: f64 = self
            .value
            .trim()
            .parse()
            .map_err(|_| RecordError::InvalidValue(self.value.clone()))?;
        if !value.is_finite() {
            return Err(RecordError::InvalidValue(self.value.clone()));
        }
        if value < 0.0 {
            return Err(RecordError::NegativeValue(value));
        }

        Ok(Record {
            id: self.id.clone().unwrap_or(fallback_id),
            date: date.format(DATE_FORMAT).to_string(),
            value,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddRecord(Record),
    UpdateRecord(Record),
    DeleteRecord(RecordId),
    SetFilter(FilterPatch),
    ResetFilter,
    ToggleAlertType(Category),
    UpdateThresholds(ThresholdConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthState {
    pub records: Vec<Record>,
    pub filter: FilterSpec,
    pub thresholds: ThresholdConfig,
}

impl Default for HealthState {
    /// Starts with a small set of demo readings.
    fn default() -> Self {
        Self::with_records(sample_records())
    }
}

impl HealthState {
    pub fn empty() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(mut records: Vec<Record>) -> Self {
        sort_by_date(&mut records);
        Self {
            records,
            filter: FilterSpec::initial(),
            thresholds: ThresholdConfig::default(),
        }
    }

    pub fn apply(mut self, command: Command) -> Self {
        debug!("applying {command:?}");
        match command {
            Command::AddRecord(record) => self.add_record(record),
            Command::UpdateRecord(record) => self.update_record(record),
            Command::DeleteRecord(id) => self.delete_record(&id),
            Command::SetFilter(patch) => self.set_filter(patch),
            Command::ResetFilter => self.reset_filter(),
            Command::ToggleAlertType(category) => self.toggle_alert_type(category),
            Command::UpdateThresholds(patch) => self.update_thresholds(patch),
        }
        self
    }

    pub fn add_record(&mut self, record: Record) {
        self.records.push(record);
        sort_by_date(&mut self.records);
    }

    /// Replaces every record with the same id. Unknown ids are ignored.
    pub fn update_record(&mut self, record: Record) {
        let mut replaced = false;
        for existing in self.records.iter_mut().filter(|r| r.id == record.id) {
            *existing = record.clone();
            replaced = true;
        }
        if replaced {
            sort_by_date(&mut self.records);
        }
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.iter().any(|r| &r.id == id)
    }

    pub fn delete_record(&mut self, id: &RecordId) {
        self.records.retain(|r| &r.id != id);
    }

    pub fn set_filter(&mut self, patch: FilterPatch) {
        if let Some(start) = patch.start_date {
            self.filter.start_date = start;
        }
        if let Some(end) = patch.end_date {
            self.filter.end_date = end;
        }
        if let Some(alert_types) = patch.alert_types {
            self.filter.alert_types = alert_types;
        }
    }

    pub fn reset_filter(&mut self) {
        self.filter = FilterSpec::initial();
    }

    pub fn toggle_alert_type(&mut self, category: Category) {
        let enabled = self.filter.is_enabled(category);
        self.filter.alert_types.insert(category, !enabled);
    }

    /// Per-field merge; ordering is not checked here.
    pub fn update_thresholds(&mut self, patch: ThresholdConfig) {
        self.thresholds = self.thresholds.merge(&patch);
    }

    /// Validates a form submission and adds or updates the record. Editing
    /// an id that is not in the session fails with `UnknownId`.
    pub fn submit(&mut self, draft: &RecordDraft) -> Result<Record, RecordError> {
        if let Some(id) = &draft.id {
            if !self.contains(id) {
                return Err(RecordError::UnknownId(id.clone()));
            }
        }
        let record = draft.validate(self.next_id())?;
        if draft.id.is_some() {
            self.update_record(record.clone());
        } else {
            self.add_record(record.clone());
        }
        Ok(record)
    }

    /// One past the largest integer id in use, or a generated text id once
    /// the integer space is exhausted.
    pub fn next_id(&self) -> RecordId {
        let max = self
            .records
            .iter()
            .filter_map(|r| match r.id {
                RecordId::Int(id) => Some(id),
                RecordId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        match max.checked_add(1) {
            Some(next) => RecordId::Int(next),
            None => RecordId::Text(format!("record-{}", Uuid::new_v4())),
        }
    }

    pub fn resolved_thresholds(&self) -> Thresholds {
        self.thresholds.resolve()
    }

    pub fn visible_records(&self) -> Vec<Record> {
        filter_records(&self.records, &self.filter, &self.resolved_thresholds())
    }

    pub fn summary(&self) -> Stats {
        compute_stats(&self.visible_records(), &self.resolved_thresholds())
    }

    pub fn chart(&self) -> ChartSeries {
        build_chart(&self.visible_records(), &self.resolved_thresholds())
    }
}

/// Stable sort by calendar date; records with unparseable dates go first.
fn sort_by_date(records: &mut [Record]) {
    records.sort_by_key(|r| r.parsed_date());
}

pub fn sample_records() -> Vec<Record> {
    vec![
        Record::new(1, "2025-04-20", 45.0),
        Record::new(2, "2025-04-21", 65.0),
        Record::new(3, "2025-04-22", 115.0),
        Record::new(4, "2025-04-23", 90.0),
        Record::new(5, "2025-04-24", 110.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(records: &[Record]) -> Vec<String> {
        records.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn default_state_has_samples_and_all_toggles_on() {
        let state = HealthState::default();
        assert_eq!(state.records.len(), 5);
        assert_eq!(state.filter, FilterSpec::initial());
        assert!(state.thresholds.is_empty());
    }

    #[test]
    fn add_keeps_records_sorted_by_date() {
        let state = HealthState::default().apply(Command::AddRecord(Record::new(
            6,
            "2025-04-19",
            70.0,
        )));
        assert_eq!(ids(&state.records), ["6", "1", "2", "3", "4", "5"]);
    }

    #[test]
    fn update_replaces_by_id_and_resorts() {
        let state = HealthState::default().apply(Command::UpdateRecord(Record::new(
            1,
            "2025-04-30",
            80.0,
        )));
        assert_eq!(ids(&state.records), ["2", "3", "4", "5", "1"]);
        assert_eq!(state.records[4].value, 80.0);
    }

    #[test]
    fn update_with_unknown_id_is_a_no_op() {
        let before = HealthState::default();
        let after = before
            .clone()
            .apply(Command::UpdateRecord(Record::new(99, "2025-01-01", 1.0)));
        assert_eq!(before, after);
    }

    #[test]
    fn delete_removes_only_matching_id() {
        let state = HealthState::default().apply(Command::DeleteRecord(RecordId::Int(3)));
        assert_eq!(ids(&state.records), ["1", "2", "4", "5"]);
    }

    #[test]
    fn set_filter_merges_shallowly() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 21);
        let state = HealthState::default().apply(Command::SetFilter(FilterPatch {
            start_date: Some(start),
            ..Default::default()
        }));
        assert_eq!(state.filter.start_date, start);
        assert_eq!(state.filter.end_date, None);
        assert!(state.filter.is_enabled(Category::Red));

        let state = state.apply(Command::SetFilter(FilterPatch {
            start_date: Some(None),
            alert_types: Some(BTreeMap::from([(Category::Green, true)])),
            ..Default::default()
        }));
        assert_eq!(state.filter.start_date, None);
        assert!(!state.filter.is_enabled(Category::Red));
        assert_eq!(ids(&state.visible_records()), ["2", "4"]);
    }

    #[test]
    fn reset_filter_restores_initial_spec() {
        let state = HealthState::default()
            .apply(Command::ToggleAlertType(Category::Green))
            .apply(Command::ResetFilter);
        assert_eq!(state.filter, FilterSpec::initial());
    }

    #[test]
    fn toggling_every_category_off_shows_everything() {
        let state = HealthState::default()
            .apply(Command::ToggleAlertType(Category::Red))
            .apply(Command::ToggleAlertType(Category::Orange))
            .apply(Command::ToggleAlertType(Category::Green));
        assert!(!state.filter.has_any_enabled());
        assert_eq!(state.visible_records().len(), 5);
    }

    #[test]
    fn threshold_updates_merge_per_field() {
        let state = HealthState::default()
            .apply(Command::UpdateThresholds(ThresholdConfig {
                upper_threshold: Some(112.0),
                ..Default::default()
            }))
            .apply(Command::UpdateThresholds(ThresholdConfig {
                lower_bound: Some(40.0),
                ..Default::default()
            }));
        let t = state.resolved_thresholds();
        assert_eq!(t.upper_threshold, 112.0);
        assert_eq!(t.lower_bound, 40.0);

        let summary = state.summary();
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.healthy_count, 3);
        assert_eq!(summary.warning_count, 1);
    }

    #[test]
    fn submit_assigns_next_integer_id() {
        let mut state = HealthState::default();
        let record = state.submit(&RecordDraft::new("2025-04-25", "72.5")).unwrap();
        assert_eq!(record.id, RecordId::Int(6));
        assert_eq!(state.records.last(), Some(&record));
    }

    #[test]
    fn submit_with_id_edits_in_place() {
        let mut state = HealthState::default();
        state
            .submit(&RecordDraft::new("2025-04-20", "55").editing(1))
            .unwrap();
        assert_eq!(state.records.len(), 5);
        assert_eq!(state.records[0].value, 55.0);
    }

    #[test]
    fn submit_rejects_bad_drafts_without_touching_state() {
        let mut state = HealthState::default();
        let before = state.clone();

        assert_eq!(
            state.submit(&RecordDraft::new("", "10")),
            Err(RecordError::MissingDate)
        );
        assert_eq!(
            state.submit(&RecordDraft::new("04/20/2025", "10")),
            Err(RecordError::InvalidDate("04/20/2025".into()))
        );
        assert_eq!(
            state.submit(&RecordDraft::new("2025-04-20", "abc")),
            Err(RecordError::InvalidValue("abc".into()))
        );
        assert_eq!(
            state.submit(&RecordDraft::new("2025-04-20", "-3")),
            Err(RecordError::NegativeValue(-3.0))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn submit_after_max_integer_id_falls_back_to_text_id() {
        let mut state =
            HealthState::with_records(vec![Record::new(i64::MAX, "2025-04-20", 60.0)]);
        let record = state.submit(&RecordDraft::new("2025-04-21", "70")).unwrap();
        match &record.id {
            RecordId::Text(id) => assert!(id.starts_with("record-")),
            other => panic!("expected generated text id, got {other:?}"),
        }
        assert_eq!(state.records.len(), 2);
    }

    #[test]
    fn update_replaces_every_record_sharing_the_id() {
        let mut state = HealthState::with_records(vec![
            Record::new(1, "2025-04-20", 45.0),
            Record::new(1, "2025-04-21", 65.0),
        ]);
        state.update_record(Record::new(1, "2025-04-22", 200.0));
        assert!(state.records.iter().all(|r| r.value == 200.0));
        assert!(state.records.iter().all(|r| r.date == "2025-04-22"));
    }

    #[test]
    fn submit_editing_unknown_id_is_an_error() {
        let mut state = HealthState::default();
        let before = state.clone();
        assert_eq!(
            state.submit(&RecordDraft::new("2025-04-20", "55").editing(99)),
            Err(RecordError::UnknownId(RecordId::Int(99)))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn next_id_ignores_text_ids() {
        let state = HealthState::with_records(vec![Record::new("import-x", "2025-01-01", 1.0)]);
        assert_eq!(state.next_id(), RecordId::Int(1));
    }
}
