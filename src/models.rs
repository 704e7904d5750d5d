use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Record identifier. Callers use integers (timestamps, sequence numbers)
/// or free-form strings, so both are accepted and kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        id.trim()
            .parse::<i64>()
            .map(Self::Int)
            .unwrap_or_else(|_| Self::Text(id.to_string()))
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::from(id.as_str())
    }
}

/// A single dated measurement. `date` is kept exactly as supplied
/// (`YYYY-MM-DD`); use [`Record::parsed_date`] for calendar comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub date: String,
    pub value: f64,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, date: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            value,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Three-tier alert label. The lowercase names are part of the external
/// contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Red,
    Orange,
    Green,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Red, Category::Orange, Category::Green];

    pub fn label(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Green => "green",
        }
    }

    /// Capitalized label used on status badges.
    pub fn badge(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Orange => "Orange",
            Self::Green => "Green",
        }
    }

    pub fn status_text(self) -> &'static str {
        match self {
            Self::Red => "Critical",
            Self::Orange => "Warning",
            Self::Green => "Normal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "orange" => Ok(Self::Orange),
            "green" => Ok(Self::Green),
            other => Err(format!(
                "unknown alert type '{other}', expected red, orange or green"
            )),
        }
    }
}

/// Summary numbers for a set of records. Always recomputed, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub critical_count: usize,
    pub warning_count: usize,
    pub healthy_count: usize,
}

impl Stats {
    pub fn total(&self) -> usize {
        self.critical_count + self.warning_count + self.healthy_count
    }

    pub fn count_for(&self, category: Category) -> usize {
        match category {
            Category::Red => self.critical_count,
            Category::Orange => self.warning_count,
            Category::Green => self.healthy_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_parses_integers_and_keeps_text() {
        assert_eq!(RecordId::from("42"), RecordId::Int(42));
        assert_eq!(
            RecordId::from("import-abc"),
            RecordId::Text("import-abc".to_string())
        );
        assert_eq!(RecordId::from(7).to_string(), "7");
    }

    #[test]
    fn record_id_json_is_untagged() {
        let ids: Vec<RecordId> = serde_json::from_str(r#"[1, "x-2"]"#).unwrap();
        assert_eq!(ids, vec![RecordId::Int(1), RecordId::Text("x-2".into())]);
    }

    #[test]
    fn parsed_date_rejects_garbage() {
        assert_eq!(
            Record::new(1, "2025-04-20", 1.0).parsed_date(),
            NaiveDate::from_ymd_opt(2025, 4, 20)
        );
        assert_eq!(Record::new(2, "20/04/2025", 1.0).parsed_date(), None);
        assert_eq!(Record::new(3, "2025-02-30", 1.0).parsed_date(), None);
    }

    #[test]
    fn category_labels_are_stable() {
        let json = serde_json::to_string(&Category::ALL).unwrap();
        assert_eq!(json, r#"["red","orange","green"]"#);
        assert_eq!("Orange".parse::<Category>(), Ok(Category::Orange));
        assert!("blue".parse::<Category>().is_err());
        assert_eq!(Category::Red.status_text(), "Critical");
        assert_eq!(Category::Green.badge(), "Green");
    }

    #[test]
    fn stats_serialize_with_contract_field_names() {
        let value = serde_json::to_value(Stats::default()).unwrap();
        for key in ["average", "min", "max", "criticalCount", "warningCount", "healthyCount"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
