pub mod types;
pub mod write;

pub use types::{Catalog, ElementRecord, StructureInfo};
pub use write::{write_elements, write_structures, write_table};
