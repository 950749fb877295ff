pub mod excel;

use crate::error::{Result, SpeciesMapError};
use serde::Serialize;
use std::path::Path;

pub use excel::write_status_workbook;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| SpeciesMapError::io(parent, e))?;
        }
    }
    Ok(())
}

/// Pretty-printed JSON dump, replacing any existing file
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|e| SpeciesMapError::io(path, e))?;
    Ok(())
}
