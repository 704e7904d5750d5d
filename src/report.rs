use std::fmt::Write;

use crate::chart::legend;
use crate::classify::classify_value;
use crate::models::{Category, Record};
use crate::state::HealthState;

const RECENT_LIMIT: usize = 5;

pub fn build_report(state: &HealthState) -> String {
    let thresholds = state.resolved_thresholds();
    let visible = state.visible_records();
    let stats = state.summary();

    let mut output = String::new();

    let _ = writeln!(output, "# Health Metrics Report");
    let _ = writeln!(
        output,
        "Showing {} of {} records ({})",
        visible.len(),
        state.records.len(),
        state.filter.describe()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");

    if visible.is_empty() {
        let _ = writeln!(output, "No readings match the current filter.");
    } else {
        let _ = writeln!(output, "- Average: {:.1}", stats.average);
        let _ = writeln!(output, "- Range: {} to {}", stats.min, stats.max);
        for category in [Category::Green, Category::Orange, Category::Red] {
            let _ = writeln!(
                output,
                "- {}: {}",
                category.status_text(),
                stats.count_for(category)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Thresholds");
    for line in legend(&thresholds) {
        let _ = writeln!(output, "- {line}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Readings");

    if visible.is_empty() {
        let _ = writeln!(output, "No readings recorded for this window.");
    } else {
        let _ = writeln!(output, "| Date | Value | Alert Status |");
        let _ = writeln!(output, "| --- | --- | --- |");
        for record in visible.iter() {
            let category = classify_value(record.value, &thresholds);
            let _ = writeln!(
                output,
                "| {} | {} | {} |",
                record.date,
                record.value,
                category.badge()
            );
        }
    }

    let mut recent: Vec<&Record> = visible.iter().collect();
    recent.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Readings");

    if recent.is_empty() {
        let _ = writeln!(output, "No readings recorded for this window.");
    } else {
        for record in recent.iter().take(RECENT_LIMIT) {
            let category = classify_value(record.value, &thresholds);
            let _ = writeln!(
                output,
                "- {}: {} ({})",
                record.date,
                record.value,
                category.status_text()
            );
        }
    }

    output
}
