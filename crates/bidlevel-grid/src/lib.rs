//! # bidlevel-grid
//!
//! Spreadsheet grid model and range sources for bidlevel.
//!
//! ## Features
//!
//! - **Grid model**: ragged, row-major [`Grid`] of [`CellValue`]s where every
//!   out-of-bounds read is simply "absent"
//! - **A1 addressing**: [`RangeSpec`] (`Bid Comparison!A1:U34`), [`CellRef`]
//!   and column-letter helpers
//! - **Sources**: Excel via `calamine`, CSV, and JSON snapshots of a Sheets
//!   API read, all behind the [`GridSource`] trait with value/formula
//!   [`RenderMode`]s
//!
//! ## Example
//!
//! ```rust,ignore
//! use bidlevel_grid::{ExcelSource, GridSource, RangeSpec};
//!
//! let source = ExcelSource::new("bids.xlsx")?;
//! let range = RangeSpec::parse("Bid Comparison!A1:Z100")?;
//! let (values, formulas) = source.read_both(&range)?;
//! ```

pub mod address;
pub mod cell;
pub mod error;
pub mod sources;

// Re-exports
pub use address::{cell_ref, column_to_index, index_to_column, CellRef, RangeSpec};
pub use cell::{CellValue, Grid, VALUE_ERROR_TOKEN};
pub use error::{GridError, Result};
pub use sources::{
    CsvOptions, CsvSource, ExcelSource, GridSource, JsonSource, RenderMode, SheetSnapshot,
};

use std::path::Path;

/// Open a grid source by file extension (`.xlsx`/`.xlsm`, `.json`, `.csv`/`.tsv`)
pub fn open_source(path: impl AsRef<Path>) -> Result<Box<dyn GridSource>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xlsm" => Ok(Box::new(ExcelSource::new(path)?)),
        "json" => Ok(Box::new(JsonSource::new(path)?)),
        "csv" => Ok(Box::new(CsvSource::new(path)?)),
        "tsv" => Ok(Box::new(CsvSource::with_options(path, CsvOptions::tsv())?)),
        other => Err(GridError::WorkbookOpen(format!(
            "Unsupported source type '{}' for {}",
            other,
            path.display()
        ))),
    }
}
