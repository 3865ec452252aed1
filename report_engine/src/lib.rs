// Internal modules
pub mod artifact;
pub mod assemble;
pub mod classify;
pub mod condition;
pub mod config;
pub mod limits;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod recipe;
pub mod staging;
pub mod table;
pub mod writer;

// Re-export key types for library consumers
pub use assemble::{DataObject, DatasetAssembler};
pub use pipeline::{PipelineError, PipelineResult};
pub use table::{Cell, DatasetSource, TabularSource};
