pub mod discover;
pub mod events;
pub mod header;
pub mod types;

pub use discover::{list_structure_files, structure_name};
pub use events::{read_event_names, EVENT_COLUMN};
pub use header::read_header;
pub use types::{Column, StructureHeader};
