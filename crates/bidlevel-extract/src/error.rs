//! Error types for layout configuration and grid reads.

use bidlevel_grid::GridError;
use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors raised while loading a layout or reading the grids to extract
///
/// Extraction over in-memory grids never fails; data-quality problems show
/// up as empty fields in the record instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Layout parameters are inconsistent
    #[error("Invalid layout '{template}': {reason}")]
    InvalidLayout { template: String, reason: String },

    /// A cell or range reference in the layout could not be parsed
    #[error("Invalid reference in layout '{template}': {source}")]
    Reference {
        template: String,
        #[source]
        source: GridError,
    },

    /// No layout registered under this id
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// Reading the value or formula grid failed
    #[error(transparent)]
    Source(#[from] GridError),

    /// TOML parse error
    #[error("Failed to parse layout: {0}")]
    Toml(#[from] toml::de::Error),
}
