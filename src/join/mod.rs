// src/join/mod.rs

pub mod merge;
pub mod plan;
pub mod read;

pub use merge::outer_join;
pub use plan::plan_reads;
pub use read::read_filtered;

use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use std::path::Path;
use tracing::info;

use crate::{
    catalog::{write::write_atomic, Catalog},
    config::Config,
    structure::EVENT_COLUMN,
};

/// Column identifying the research subject of each record.
pub const SUBJECT_COLUMN: &str = "subjectkey";

/// An in-memory table of string cells.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read the configured elements of interest at the configured event and
/// join them into one table keyed by subject.
///
/// The first structure read also contributes the common columns other than
/// the subject and event columns.
pub fn join_elements(catalog: &Catalog, cfg: &Config) -> Result<Table> {
    let delimiter = cfg.delimiter_byte()?;
    let common = &cfg.join.common;
    let plan = plan_reads(catalog, &cfg.elements_of_interest(), common)?;
    info!(structures = plan.len(), event = %cfg.event, "joining elements");

    let mut tables = Vec::with_capacity(plan.len());
    for (i, (structure, elements)) in plan.iter().enumerate() {
        let path = catalog
            .source(structure)
            .ok_or_else(|| anyhow!("no source file for structure {}", structure))?;

        let mut columns = vec![SUBJECT_COLUMN.to_string()];
        if i == 0 {
            columns.extend(
                common
                    .iter()
                    .filter(|c| c.as_str() != SUBJECT_COLUMN && c.as_str() != EVENT_COLUMN)
                    .cloned(),
            );
        }
        columns.extend(elements.iter().cloned());

        let table = read_filtered(path, delimiter, &columns, EVENT_COLUMN, &cfg.event)
            .with_context(|| format!("reading elements from {}", structure))?;
        tables.push(table);
    }

    let joined = outer_join(tables)?;
    info!(
        columns = joined.columns.len(),
        subjects = joined.rows.len(),
        "joined"
    );
    Ok(joined)
}

/// Write a table as delimited text, header row first.
pub fn write_joined<P: AsRef<Path>>(path: P, delimiter: u8, table: &Table) -> Result<()> {
    let path = path.as_ref();
    write_atomic(path, |tmp| {
        let mut wtr = WriterBuilder::new()
            .delimiter(delimiter)
            .quote_style(QuoteStyle::Necessary)
            .from_writer(tmp);
        wtr.write_record(&table.columns)
            .with_context(|| format!("writing header to {:?}", path))?;
        for row in &table.rows {
            wtr.write_record(row)
                .with_context(|| format!("writing row to {:?}", path))?;
        }
        wtr.flush()
            .with_context(|| format!("flushing {:?}", path))?;
        Ok(())
    })
}
