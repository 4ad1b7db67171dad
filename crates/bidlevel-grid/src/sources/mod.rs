//! Grid source implementations.
//!
//! This module contains adapters that read a rectangular range from a
//! spreadsheet-like source (Excel workbooks, CSV files, JSON snapshots of a
//! Sheets API response) in either value or formula rendering.

pub mod csv;
pub mod excel;
pub mod json;

pub use self::csv::{CsvOptions, CsvSource};
pub use self::excel::ExcelSource;
pub use self::json::{JsonSource, SheetSnapshot};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::RangeSpec;
use crate::cell::Grid;
use crate::error::Result;

/// How cells are rendered when a range is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Computed (displayed) values
    #[default]
    Value,
    /// Formula text where a cell holds a formula, the literal value otherwise
    Formula,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Value => "value",
            RenderMode::Formula => "formula",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for sources that can provide a grid for a range
pub trait GridSource {
    /// Read a range of cells in the given render mode
    ///
    /// The returned grid is 0-indexed from the range's top-left corner.
    /// When the range names no sheet, the source's default sheet is used.
    fn read_range(&self, range: &RangeSpec, mode: RenderMode) -> Result<Grid>;

    /// List available sheets in the source
    fn list_sheets(&self) -> Result<Vec<String>>;

    /// Get the default sheet name
    fn default_sheet(&self) -> Option<String>;

    /// Read the same range twice, once per render mode: `(values, formulas)`
    fn read_both(&self, range: &RangeSpec) -> Result<(Grid, Grid)> {
        let values = self.read_range(range, RenderMode::Value)?;
        let formulas = self.read_range(range, RenderMode::Formula)?;
        Ok((values, formulas))
    }
}
