//! Tabular source abstraction: tagged cells, capability traits, CSV shim

pub mod cell;
pub mod csv;
pub mod source;

pub use cell::Cell;
pub use csv::{read_datasets, read_table, TableError};
pub use source::{DatasetSource, MemoryDatasets, MemoryTable, SourceMetadata, TabularSource};
