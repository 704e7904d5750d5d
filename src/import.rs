use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use log::{debug, warn};
use uuid::Uuid;

use crate::models::{parse_date, Record, RecordId};

#[derive(serde::Deserialize)]
struct CsvRow {
    id: Option<String>,
    date: String,
    value: f64,
}

/// Reads `id,date,value` rows. Empty ids get a generated `import-<uuid>`;
/// dates that do not parse are kept as written so the filter can treat
/// them the same way it treats any other malformed stored date. A repeated
/// id is an error naming both rows.
pub fn read_records<R: Read>(reader: R) -> anyhow::Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    let mut seen: HashMap<RecordId, usize> = HashMap::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid record on data row {}", index + 1))?;

        if parse_date(&row.date).is_none() {
            warn!("row {}: date '{}' is not YYYY-MM-DD, keeping as-is", index + 1, row.date);
        }

        let id = row
            .id
            .filter(|id| !id.is_empty())
            .map(RecordId::from)
            .unwrap_or_else(|| RecordId::Text(format!("import-{}", Uuid::new_v4())));

        if let Some(first_row) = seen.insert(id.clone(), index + 1) {
            anyhow::bail!(
                "duplicate id '{}' on data row {} (first seen on data row {})",
                id,
                index + 1,
                first_row
            );
        }

        records.push(Record {
            id,
            date: row.date,
            value: row.value,
        });
    }

    debug!("read {} records", records.len());
    Ok(records)
}

pub fn import_csv(csv_path: &Path) -> anyhow::Result<Vec<Record>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    read_records(file).with_context(|| format!("failed to import {}", csv_path.display()))
}
