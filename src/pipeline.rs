// src/pipeline.rs

use anyhow::{Context, Result};
use std::{path::Path, time::Instant};
use tracing::{debug, info, instrument};

use crate::{
    catalog::{write_elements, write_structures, Catalog, StructureInfo},
    config::Config,
    join::{join_elements, write_joined, Table},
    lookup::{Offline, StructureLookup},
    structure::{list_structure_files, read_event_names, read_header, StructureHeader},
};

/// Header, events and title for one structure file.
#[instrument(level = "info", skip(path, lookup), fields(file = %path.as_ref().display()))]
pub fn process_structure(
    path: impl AsRef<Path>,
    delimiter: u8,
    lookup: &dyn StructureLookup,
) -> Result<(StructureHeader, StructureInfo)> {
    let path = path.as_ref();
    let header = read_header(path, delimiter)?;
    let event_names = read_event_names(path, &header, delimiter)?;
    let title = lookup
        .title(&header.name)
        .with_context(|| format!("looking up structure {}", header.name))?;

    debug!(
        structure = %header.name,
        columns = header.columns.len(),
        events = event_names.as_ref().map(Vec::len),
        title = title.as_deref().unwrap_or("-"),
        "processed"
    );
    Ok((header, StructureInfo { title, event_names }))
}

/// Walk every structure file under the configured directory, one at a time.
pub fn build_catalog(cfg: &Config, lookup: &dyn StructureLookup) -> Result<Catalog> {
    let delimiter = cfg.delimiter_byte()?;
    let files = list_structure_files(&cfg.data_dir, &cfg.pattern)?;
    info!(
        dir = %cfg.data_dir.display(),
        files = files.len(),
        "scanning structures"
    );

    let mut catalog = Catalog::new();
    for path in &files {
        let (header, info) = process_structure(path, delimiter, lookup)?;
        catalog.add_structure(&header, info);
    }

    info!(
        elements = catalog.elements.len(),
        unique_elements = catalog.unique_element_count(),
        structures = catalog.structures.len(),
        event_names = catalog.event_names.len(),
        "catalog built"
    );
    Ok(catalog)
}

/// Build the catalog and write the configured outputs.
pub fn run_catalog(cfg: &Config, lookup: &dyn StructureLookup) -> Result<Catalog> {
    let start = Instant::now();
    let catalog = build_catalog(cfg, lookup)?;

    write_elements(&cfg.output, &catalog.elements)?;
    info!(path = %cfg.output.display(), rows = catalog.elements.len(), "wrote element catalog");

    if let Some(path) = &cfg.structures_output {
        write_structures(path, &catalog.structures)?;
        info!(path = %path.display(), "wrote structure catalog");
    }

    info!("completed in {:?}", start.elapsed());
    Ok(catalog)
}

/// Scan headers without remote lookups, then join the elements of interest
/// and write the joined table.
pub fn run_join(cfg: &Config) -> Result<Table> {
    let start = Instant::now();
    let catalog = build_catalog(cfg, &Offline)?;
    let joined = join_elements(&catalog, cfg)?;

    write_joined(&cfg.join.output, b'\t', &joined)?;
    info!(path = %cfg.join.output.display(), rows = joined.rows.len(), "wrote joined table");

    info!("completed in {:?}", start.elapsed());
    Ok(joined)
}
