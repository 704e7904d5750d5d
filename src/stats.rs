use crate::classify::classify_value;
use crate::models::{Category, Record, Stats};
use crate::thresholds::Thresholds;

/// Aggregates a record set. Categories come from the same `thresholds`
/// the caller uses for filtering, so the three counts always add up to
/// `records.len()`. A NaN value is skipped by `min`/`max` but makes the
/// average NaN.
pub fn compute_stats(records: &[Record], thresholds: &Thresholds) -> Stats {
    if records.is_empty() {
        return Stats::default();
    }

    let mut stats = Stats {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        ..Stats::default()
    };
    let mut total = 0.0;

    for record in records {
        total += record.value;
        stats.min = stats.min.min(record.value);
        stats.max = stats.max.max(record.value);

        match classify_value(record.value, thresholds) {
            Category::Red => stats.critical_count += 1,
            Category::Orange => stats.warning_count += 1,
            Category::Green => stats.healthy_count += 1,
        }
    }

    stats.average = round_to_tenth(total / records.len() as f64);
    stats
}

/// Rounds half away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
