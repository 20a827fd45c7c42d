use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, instrument};

use super::header::open_reader;
use super::StructureHeader;

/// Column that labels the study timepoint of each record.
pub const EVENT_COLUMN: &str = "eventname";

/// Collect the distinct event names of a structure, in first-seen order.
///
/// Returns `None` when the header has no `eventname` column. Otherwise the
/// file is read again past both header rows and only that column is kept.
/// Empty cells are skipped.
#[instrument(level = "debug", skip(path, header), fields(structure = %header.name))]
pub fn read_event_names(
    path: impl AsRef<Path>,
    header: &StructureHeader,
    delimiter: u8,
) -> Result<Option<Vec<String>>> {
    let Some(idx) = header.position(EVENT_COLUMN) else {
        return Ok(None);
    };
    let path = path.as_ref();

    let mut rdr = open_reader(path, delimiter)?;
    let mut events: Vec<String> = Vec::new();
    for (row, record) in rdr.records().enumerate().skip(2) {
        let record =
            record.with_context(|| format!("{}: reading data row {}", path.display(), row))?;
        let Some(value) = record.get(idx) else {
            continue;
        };
        if value.is_empty() || events.iter().any(|e| e == value) {
            continue;
        }
        events.push(value.to_string());
    }

    debug!(count = events.len(), "collected event names");
    Ok(Some(events))
}
