//! Species Map Common Library
//!
//! Pure types and rules shared by the CLI: coordinate recovery, status
//! classification and report formatting. No I/O happens here.

pub mod cell;
pub mod coord;
pub mod error;
pub mod export;
pub mod report;
pub mod status;
pub mod types;

pub use cell::CellValue;
pub use coord::{
    normalize_decimal_separator, parse_cell, parse_cell_with, parse_coordinate,
    parse_coordinate_with, split_coordinate, split_coordinate_with, Component,
    CoordinateRejection, DigitLayout, ParsedCoordinate,
};
pub use error::{Error, Result};
pub use report::{format_status_table, status_table_rows};
pub use status::{MarkerColor, StatusClassification};
pub use types::{MapPoint, ObservationRecord, OccurrencePoint, SpeciesValidationResult};
