//! Status workbook output

use crate::error::{Result, SpeciesMapError};
use species_map_common::export::excel_core::generate_status_workbook;
use species_map_common::{ObservationRecord, SpeciesValidationResult};
use std::path::Path;

/// Write the observations/species workbook, replacing any existing file
pub fn write_status_workbook(
    path: &Path,
    records: &[ObservationRecord],
    results: &[SpeciesValidationResult],
    region: Option<&str>,
) -> Result<()> {
    let bytes = generate_status_workbook(records, results, region)
        .map_err(|e| SpeciesMapError::ExcelGeneration(e.to_string()))?;
    super::ensure_parent(path)?;
    std::fs::write(path, bytes).map_err(|e| SpeciesMapError::io(path, e))?;
    Ok(())
}
