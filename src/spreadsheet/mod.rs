//! Spreadsheet input
//!
//! Reads one worksheet into a header row plus data rows. Column names are
//! resolved at run time; a missing column is fatal for the run.

mod cell;

pub use cell::to_cell_value;

use crate::error::{Result, SpeciesMapError};
use calamine::{open_workbook_auto, Reader};
use species_map_common::CellValue;
use std::path::Path;

static EMPTY: CellValue = CellValue::Empty;

#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

#[derive(Debug, Clone)]
pub struct SheetRow {
    /// 1-based row number as shown by spreadsheet software
    pub number: usize,
    pub cells: Vec<CellValue>,
}

impl SheetRow {
    /// Out-of-range columns read as empty
    pub fn cell(&self, index: usize) -> &CellValue {
        self.cells.get(index).unwrap_or(&EMPTY)
    }
}

impl SheetTable {
    /// Index of a header, matched after trimming
    pub fn column(&self, name: &str) -> Result<usize> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim() == wanted)
            .ok_or_else(|| SpeciesMapError::MissingColumn {
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load a worksheet (the first one unless `sheet` is given).
///
/// Fully blank rows are skipped.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<SheetTable> {
    if !path.exists() {
        return Err(SpeciesMapError::InputNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| SpeciesMapError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| {
                SpeciesMapError::Spreadsheet(format!("{}: workbook has no sheets", path.display()))
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SpeciesMapError::Spreadsheet(format!("sheet '{}': {}", sheet_name, e)))?;

    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows = range.rows();

    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|data| to_cell_value(data).display())
            .collect(),
        None => Vec::new(),
    };

    let rows = rows
        .enumerate()
        .map(|(i, data)| SheetRow {
            number: first_row + i + 2,
            cells: data.iter().map(to_cell_value).collect(),
        })
        .filter(|row| !row.cells.iter().all(|c| c.is_missing()))
        .collect();

    tracing::debug!(sheet = %sheet_name, "loaded worksheet");

    Ok(SheetTable { headers, rows })
}
