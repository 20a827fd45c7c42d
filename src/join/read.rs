use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing::{debug, instrument};

use super::Table;
use crate::structure::header::open_reader;

/// Read `columns` from a structure file, keeping only the rows whose
/// `event_column` equals `event`. Row 0 names the columns; row 1 holds the
/// descriptions and is skipped.
#[instrument(level = "info", skip(path, columns), fields(file = %path.as_ref().display()))]
pub fn read_filtered(
    path: impl AsRef<Path>,
    delimiter: u8,
    columns: &[String],
    event_column: &str,
    event: &str,
) -> Result<Table> {
    let path = path.as_ref();
    let mut rdr = open_reader(path, delimiter)?;
    let mut records = rdr.records();

    let header = records
        .next()
        .ok_or_else(|| anyhow!("{}: empty file", path.display()))?
        .with_context(|| format!("{}: reading header", path.display()))?;
    let names: Vec<&str> = header
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}'))
        .collect();
    let index_of = |column: &str| {
        names
            .iter()
            .position(|n| *n == column)
            .ok_or_else(|| anyhow!("{}: no column {}", path.display(), column))
    };

    let wanted = columns
        .iter()
        .map(|c| index_of(c.as_str()))
        .collect::<Result<Vec<usize>>>()?;
    let event_idx = index_of(event_column)?;

    let mut rows = Vec::new();
    let mut scanned = 0usize;
    for (row, record) in records.enumerate().skip(1) {
        let record =
            record.with_context(|| format!("{}: reading data row {}", path.display(), row + 1))?;
        scanned += 1;
        if record.get(event_idx) != Some(event) {
            continue;
        }
        rows.push(
            wanted
                .iter()
                .map(|&i| record.get(i).unwrap_or("").to_string())
                .collect(),
        );
    }

    debug!(scanned, kept = rows.len(), "filtered rows");
    Ok(Table {
        columns: columns.to_vec(),
        rows,
    })
}
