use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeciesMapError {
    #[error("config error: {0}")]
    Config(String),

    #[error("input file not found: {0}")]
    InputNotFound(String),

    #[error("column '{column}' not found in spreadsheet (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("no usable rows: {0}")]
    EmptyResult(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("failed to parse API response: {0}")]
    ApiParse(String),

    #[error("map rendering error: {0}")]
    Render(String),

    #[error("Excel generation error: {0}")]
    ExcelGeneration(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SpeciesMapError {
    /// Wrap an I/O failure with the path it concerns
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        SpeciesMapError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpeciesMapError>;
