//! Status workbook generation
//!
//! Two sheets: `observations` (one line per accepted row) and `species`
//! (the validation summary).

use crate::error::{Error, Result};
use crate::report::status_table_rows;
use crate::types::{ObservationRecord, SpeciesValidationResult};
use rust_xlsxwriter::*;

const OBSERVATION_HEADERS: [&str; 7] = [
    "ROW",
    "SPECIES",
    "LATITUDE",
    "LONGITUDE",
    "STATUS",
    "TAXON KEY",
    "OCCURRENCES",
];

const SPECIES_HEADERS: [&str; 4] = ["SPECIES", "STATUS", "TAXON KEY", "OCCURRENCES"];

/// Build the workbook into a buffer
///
/// # Arguments
/// * `records` - merged observation rows
/// * `results` - one validation result per species
/// * `region` - region code used for the status labels
pub fn generate_status_workbook(
    records: &[ObservationRecord],
    results: &[SpeciesValidationResult],
    region: Option<&str>,
) -> Result<Vec<u8>> {
    build_workbook(records, results, region).map_err(|e| Error::Export(e.to_string()))
}

fn build_workbook(
    records: &[ObservationRecord],
    results: &[SpeciesValidationResult],
    region: Option<&str>,
) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let observations = workbook.add_worksheet();
    observations.set_name("observations")?;
    for (col, title) in OBSERVATION_HEADERS.iter().enumerate() {
        observations.write_string_with_format(0, col as u16, *title, &header_format)?;
    }
    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        observations.write_number(row, 0, record.row as f64)?;
        observations.write_string(row, 1, record.species.as_str())?;
        observations.write_number(row, 2, record.coordinate.latitude)?;
        observations.write_number(row, 3, record.coordinate.longitude)?;
        observations.write_string(row, 4, record.validation.label(region))?;
        match record.validation.taxon_key {
            Some(key) => observations.write_number(row, 5, key as f64)?,
            None => observations.write_string(row, 5, "-")?,
        };
        observations.write_number(row, 6, record.validation.occurrence_count as f64)?;
    }
    observations.autofit();

    let species = workbook.add_worksheet();
    species.set_name("species")?;
    for (col, title) in SPECIES_HEADERS.iter().enumerate() {
        species.write_string_with_format(0, col as u16, *title, &header_format)?;
    }
    for (i, cells) in status_table_rows(results, region).iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, cell) in cells.iter().enumerate() {
            species.write_string(row, col as u16, cell.as_str())?;
        }
    }
    species.autofit();

    workbook.save_to_buffer()
}
