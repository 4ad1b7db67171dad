//! CSV grid source.
//!
//! CSV exports carry rendered values only, so formula reads are rejected.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::address::RangeSpec;
use crate::cell::{CellValue, Grid};
use crate::error::{GridError, Result};
use crate::sources::{GridSource, RenderMode};

/// Options for CSV parsing
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvOptions {
    /// Create options for tab-separated values (TSV)
    pub fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }
}

/// CSV file grid source
pub struct CsvSource {
    /// Path to the CSV file
    path: String,
    /// Parsing options
    options: CsvOptions,
}

impl CsvSource {
    /// Create a new CSV source from a file path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(path, CsvOptions::default())
    }

    /// Create a new CSV source with custom options
    pub fn with_options(path: impl AsRef<Path>, options: CsvOptions) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();

        if !path.as_ref().exists() {
            return Err(GridError::FileNotFound(path_str));
        }

        Ok(Self {
            path: path_str,
            options,
        })
    }

    /// Read every record as a grid of text cells
    pub fn read_all(&self) -> Result<Grid> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(CellValue::from).collect());
        }

        Ok(Grid::new(rows))
    }
}

impl GridSource for CsvSource {
    fn read_range(&self, range: &RangeSpec, mode: RenderMode) -> Result<Grid> {
        // CSV doesn't have sheets, the sheet name is ignored
        if mode == RenderMode::Formula {
            return Err(GridError::UnsupportedRenderMode {
                mode: mode.as_str(),
                source_kind: "CSV",
            });
        }

        let all = self.read_all()?;
        Ok(all.slice(range.start.row, range.start.col, range.end.row, range.end.col))
    }

    fn list_sheets(&self) -> Result<Vec<String>> {
        Ok(vec!["data".to_string()])
    }

    fn default_sheet(&self) -> Option<String> {
        Some("data".to_string())
    }
}
