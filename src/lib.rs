pub mod catalog;
pub mod config;
pub mod join;
pub mod lookup;
pub mod pipeline;
pub mod structure;
