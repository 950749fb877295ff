//! Spreadsheet cell values
//!
//! A reader-independent view of one cell, so the parsing rules can be
//! exercised without a workbook on disk.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Dates, durations, error cells
    Other(String),
}

impl CellValue {
    /// Text content, only for text cells
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Empty cell or whitespace-only text
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Short name of the value kind, for rejection messages
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Text(_) => "text",
            CellValue::Int(_) => "integer",
            CellValue::Float(_) => "float",
            CellValue::Bool(_) => "boolean",
            CellValue::Other(_) => "other",
        }
    }

    /// Numeric coercion; anything that is not a finite number becomes `None`.
    ///
    /// Text is trimmed and a comma decimal separator is accepted.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            CellValue::Int(i) => *i as f64,
            CellValue::Float(f) => *f,
            CellValue::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Label rendering of any value
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Other(s) => s.clone(),
        }
    }
}
