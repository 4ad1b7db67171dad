//! Error types for grid sources.

use thiserror::Error;

/// Result type for grid operations
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors that can occur while reading a grid from a source
#[derive(Debug, Error)]
pub enum GridError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Failed to open workbook
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    /// Sheet not found in workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Invalid range or cell reference
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// The source cannot render the requested layer (e.g. formulas from CSV)
    #[error("Render mode '{mode}' is not supported by {source_kind} sources")]
    UnsupportedRenderMode {
        mode: &'static str,
        source_kind: &'static str,
    },

    /// Snapshot or grid payload is not a sequence of rows
    #[error("Malformed grid: {0}")]
    MalformedGrid(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Calamine error
    #[error("Excel error: {0}")]
    Calamine(String),
}

impl From<calamine::Error> for GridError {
    fn from(err: calamine::Error) -> Self {
        GridError::Calamine(err.to_string())
    }
}

impl From<calamine::XlsxError> for GridError {
    fn from(err: calamine::XlsxError) -> Self {
        GridError::Calamine(err.to_string())
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::MalformedGrid(err.to_string())
    }
}
