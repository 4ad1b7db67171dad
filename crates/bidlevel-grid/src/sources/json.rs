//! JSON snapshot grid source.
//!
//! A snapshot captures the two Sheets API reads of one range side by side:
//!
//! ```json
//! {
//!   "sheet": "Bid Comparison",
//!   "origin": "A1",
//!   "values":   [["", "BID COMPARISON TEMPLATE"], ["", "", "", "Acme"]],
//!   "formulas": [["", "BID COMPARISON TEMPLATE"], ["", "", "", "Acme"]]
//! }
//! ```
//!
//! `formulas` is optional; without it a formula read returns the values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::address::{CellRef, RangeSpec};
use crate::cell::Grid;
use crate::error::{GridError, Result};
use crate::sources::{GridSource, RenderMode};

fn default_origin() -> String {
    "A1".to_string()
}

/// Value and formula layers of one captured range
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SheetSnapshot {
    /// Sheet the snapshot was taken from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,

    /// Top-left cell the grids are anchored at
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Rendered values
    pub values: Grid,

    /// Formula rendering of the same range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formulas: Option<Grid>,
}

impl SheetSnapshot {
    pub fn new(values: Grid, formulas: Option<Grid>) -> Self {
        Self {
            sheet: None,
            origin: default_origin(),
            values,
            formulas,
        }
    }

    /// Parse a snapshot from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Grid source backed by a [`SheetSnapshot`] file
pub struct JsonSource {
    snapshot: SheetSnapshot,
    origin: CellRef,
}

impl JsonSource {
    /// Load a snapshot from a JSON file
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GridError::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_snapshot(SheetSnapshot::from_json_str(&content)?)
    }

    pub fn from_snapshot(snapshot: SheetSnapshot) -> Result<Self> {
        let origin: CellRef = snapshot.origin.parse()?;
        Ok(Self { snapshot, origin })
    }

    pub fn snapshot(&self) -> &SheetSnapshot {
        &self.snapshot
    }
}

impl GridSource for JsonSource {
    fn read_range(&self, range: &RangeSpec, mode: RenderMode) -> Result<Grid> {
        if let (Some(wanted), Some(have)) = (&range.sheet, &self.snapshot.sheet) {
            if wanted != have {
                return Err(GridError::SheetNotFound(wanted.clone()));
            }
        }

        let grid = match (mode, &self.snapshot.formulas) {
            (RenderMode::Value, _) => &self.snapshot.values,
            (RenderMode::Formula, Some(formulas)) => formulas,
            (RenderMode::Formula, None) => {
                warn!("snapshot has no formula layer, using values");
                &self.snapshot.values
            }
        };

        // Translate the requested range into snapshot-relative positions
        if range.end.row < self.origin.row || range.end.col < self.origin.col {
            return Ok(Grid::default());
        }
        let start_row = range.start.row.saturating_sub(self.origin.row);
        let start_col = range.start.col.saturating_sub(self.origin.col);
        let end_row = range.end.row - self.origin.row;
        let end_col = range.end.col - self.origin.col;

        Ok(grid.slice(start_row, start_col, end_row, end_col))
    }

    fn list_sheets(&self) -> Result<Vec<String>> {
        Ok(self.default_sheet().into_iter().collect())
    }

    fn default_sheet(&self) -> Option<String> {
        self.snapshot.sheet.clone()
    }
}
