//! Plot-ready series for a time chart of readings.

use serde::{Deserialize, Serialize};

use crate::classify::classify_value;
use crate::models::{Category, Record};
use crate::thresholds::Thresholds;

const DOMAIN_FLOOR_FACTOR: f64 = 0.8;
const DOMAIN_CEIL_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub value: f64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub label: &'static str,
    pub value: f64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
    pub y_min: f64,
    pub y_max: f64,
    pub reference_lines: Vec<ReferenceLine>,
}

pub fn build_chart(records: &[Record], thresholds: &Thresholds) -> ChartSeries {
    let points: Vec<ChartPoint> = records
        .iter()
        .map(|r| ChartPoint {
            date: r.date.clone(),
            value: r.value,
            category: classify_value(r.value, thresholds),
        })
        .collect();

    let (min_value, max_value) = if points.is_empty() {
        (0.0, 0.0)
    } else {
        points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        })
    };

    // Padded so the outer threshold lines always fit.
    let y_min = (min_value.min(thresholds.lower_threshold) * DOMAIN_FLOOR_FACTOR)
        .floor()
        .max(0.0);
    let y_max = (max_value.max(thresholds.upper_threshold) * DOMAIN_CEIL_FACTOR).ceil();

    ChartSeries {
        points,
        y_min,
        y_max,
        reference_lines: reference_lines(thresholds),
    }
}

pub fn reference_lines(thresholds: &Thresholds) -> Vec<ReferenceLine> {
    vec![
        ReferenceLine {
            label: "Lower Critical",
            value: thresholds.lower_threshold,
            category: Category::Red,
        },
        ReferenceLine {
            label: "Lower Warning",
            value: thresholds.lower_bound,
            category: Category::Orange,
        },
        ReferenceLine {
            label: "Upper Warning",
            value: thresholds.upper_bound,
            category: Category::Orange,
        },
        ReferenceLine {
            label: "Upper Critical",
            value: thresholds.upper_threshold,
            category: Category::Red,
        },
    ]
}

/// One-line description of each band, for legends.
pub fn legend(thresholds: &Thresholds) -> [String; 3] {
    let t = thresholds;
    [
        format!(
            "Normal (Green): {} - {}",
            t.lower_bound, t.upper_bound
        ),
        format!(
            "Warning (Orange): {} - {} or {} - {}",
            t.lower_threshold, t.lower_bound, t.upper_bound, t.upper_threshold
        ),
        format!(
            "Critical (Red): Below {} or above {}",
            t.lower_threshold, t.upper_threshold
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chart_still_spans_thresholds() {
        let chart = build_chart(&[], &Thresholds::default());
        assert!(chart.points.is_empty());
        assert_eq!(chart.y_min, 0.0);
        assert_eq!(chart.y_max, 180.0);
        assert_eq!(chart.reference_lines.len(), 4);
    }

    #[test]
    fn domain_grows_with_data() {
        let records = vec![
            Record::new(1, "2025-04-20", 30.0),
            Record::new(2, "2025-04-21", 210.0),
        ];
        let chart = build_chart(&records, &Thresholds::default());
        assert_eq!(chart.y_min, 16.0);
        assert_eq!(chart.y_max, 252.0);
        assert_eq!(chart.points[0].category, Category::Orange);
        assert_eq!(chart.points[1].category, Category::Red);
    }

    #[test]
    fn domain_never_goes_negative() {
        let thresholds = Thresholds {
            lower_threshold: -40.0,
            ..Default::default()
        };
        let chart = build_chart(&[Record::new(1, "2025-04-20", 60.0)], &thresholds);
        assert_eq!(chart.y_min, 0.0);
    }

    #[test]
    fn reference_lines_follow_threshold_order() {
        let labels: Vec<_> = reference_lines(&Thresholds::default())
            .iter()
            .map(|l| (l.label, l.value))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Lower Critical", 20.0),
                ("Lower Warning", 50.0),
                ("Upper Warning", 100.0),
                ("Upper Critical", 150.0),
            ]
        );
    }

    #[test]
    fn legend_lists_each_band() {
        let [normal, warning, critical] = legend(&Thresholds::default());
        assert_eq!(normal, "Normal (Green): 50 - 100");
        assert_eq!(warning, "Warning (Orange): 20 - 50 or 100 - 150");
        assert_eq!(critical, "Critical (Red): Below 20 or above 150");
    }
}
