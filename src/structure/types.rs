// src/structure/types.rs

use std::path::PathBuf;

/// One column of a structure as declared by its two header rows.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Column {
    pub element: String,
    pub description: String,
}

/// The header of one structure file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureHeader {
    pub name: String,
    pub path: PathBuf,
    pub columns: Vec<Column>,
}

impl StructureHeader {
    /// Index of the column whose element name is exactly `element`.
    pub fn position(&self, element: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.element == element)
    }
}
