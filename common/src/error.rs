//! Error types

use thiserror::Error;

/// Shared error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Export error: {0}")]
    Export(String),
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_export() {
        let error = Error::Export("sheet name too long".to_string());
        assert_eq!(format!("{}", error), "Export error: sheet name too long");
    }
}
