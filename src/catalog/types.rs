// src/catalog/types.rs

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use crate::structure::StructureHeader;

/// One column of one structure, as it appears in the element catalog.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct ElementRecord {
    pub element: String,
    pub description: Option<String>,
    pub structure: String,
}

/// What is known about a structure beyond its columns.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Default)]
pub struct StructureInfo {
    pub title: Option<String>,
    /// `None` when the structure has no `eventname` column.
    pub event_names: Option<Vec<String>>,
}

impl StructureInfo {
    pub fn has_event(&self, event: &str) -> bool {
        self.event_names
            .as_ref()
            .is_some_and(|names| names.iter().any(|n| n == event))
    }
}

/// Everything extracted in one run.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    pub elements: Vec<ElementRecord>,
    pub structures: BTreeMap<String, StructureInfo>,
    pub event_names: BTreeSet<String>,
    /// Source file of each structure.
    pub sources: BTreeMap<String, PathBuf>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one element record per header column and register the
    /// structure's info. A blank description cell is recorded as `None`.
    /// Event names are folded into the run-wide set.
    pub fn add_structure(&mut self, header: &StructureHeader, info: StructureInfo) {
        for col in &header.columns {
            self.elements.push(ElementRecord {
                element: col.element.clone(),
                description: (!col.description.is_empty()).then(|| col.description.clone()),
                structure: header.name.clone(),
            });
        }
        if let Some(names) = &info.event_names {
            self.event_names.extend(names.iter().cloned());
        }
        self.structures.insert(header.name.clone(), info);
        self.sources.insert(header.name.clone(), header.path.clone());
    }

    pub fn source(&self, structure: &str) -> Option<&Path> {
        self.sources.get(structure).map(PathBuf::as_path)
    }

    /// Structures collected at `event`, in name order.
    pub fn structures_at_event<'a>(
        &'a self,
        event: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a StructureInfo)> + 'a {
        self.structures
            .iter()
            .filter(move |(_, info)| info.has_event(event))
            .map(|(name, info)| (name.as_str(), info))
    }

    /// Structures with no event data at all.
    pub fn structures_without_events(&self) -> impl Iterator<Item = (&str, &StructureInfo)> {
        self.structures
            .iter()
            .filter(|(_, info)| info.event_names.as_ref().map_or(true, Vec::is_empty))
            .map(|(name, info)| (name.as_str(), info))
    }

    /// Structures that define `element`, in name order without repeats.
    pub fn structures_for_element(&self, element: &str) -> Vec<&str> {
        let found: BTreeSet<&str> = self
            .elements
            .iter()
            .filter(|r| r.element == element)
            .map(|r| r.structure.as_str())
            .collect();
        found.into_iter().collect()
    }

    pub fn unique_element_count(&self) -> usize {
        self.elements
            .iter()
            .map(|r| r.element.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}
