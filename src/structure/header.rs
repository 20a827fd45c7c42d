// src/structure/header.rs

use anyhow::{anyhow, Context, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::{fs::File, path::Path};
use tracing::{debug, instrument};

use super::{structure_name, Column, StructureHeader};

/// Open a structure file for record-by-record reading. Both header rows are
/// returned as ordinary records.
pub(crate) fn open_reader(path: &Path, delimiter: u8) -> Result<Reader<File>> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))
}

fn next_row(
    records: &mut impl Iterator<Item = csv::Result<StringRecord>>,
    path: &Path,
    what: &str,
) -> Result<StringRecord> {
    records
        .next()
        .ok_or_else(|| anyhow!("{}: missing {} row", path.display(), what))?
        .with_context(|| format!("{}: reading {} row", path.display(), what))
}

fn strip_bom(s: &str) -> &str {
    s.trim_start_matches('\u{feff}')
}

/// Read the element-name row and the description row of a structure file.
/// No data rows are read.
#[instrument(level = "debug", skip(path), fields(file = %path.as_ref().display()))]
pub fn read_header(path: impl AsRef<Path>, delimiter: u8) -> Result<StructureHeader> {
    let path = path.as_ref();
    let name = structure_name(path)?;
    let mut rdr = open_reader(path, delimiter)?;
    let mut records = rdr.records();

    let elements = next_row(&mut records, path, "element name")?;
    let descriptions = next_row(&mut records, path, "description")?;

    if elements.len() != descriptions.len() {
        return Err(anyhow!(
            "{}: {} element names but {} descriptions",
            path.display(),
            elements.len(),
            descriptions.len()
        ));
    }

    let columns: Vec<Column> = elements
        .iter()
        .zip(descriptions.iter())
        .enumerate()
        .map(|(idx, (element, description))| {
            let (element, description) = if idx == 0 {
                (strip_bom(element), strip_bom(description))
            } else {
                (element, description)
            };
            Column {
                element: element.to_string(),
                description: description.to_string(),
            }
        })
        .collect();

    debug!(structure = %name, columns = columns.len(), "read header");
    Ok(StructureHeader {
        name,
        path: path.to_path_buf(),
        columns,
    })
}
