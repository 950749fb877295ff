//! Run orchestration, one module per command

pub mod occurrences;
pub mod plot;
pub mod validate;

pub use occurrences::{run_occurrences, OccurrenceReport};
pub use plot::run_plot;
pub use validate::{
    build_validation_map, extract_observations, merge_observations, run_validation,
    unique_species, DropReason, DroppedRow, ExtractedRows, ParsedRow, ValidationReport,
};
