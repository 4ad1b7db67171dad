//! Cell values and the row-major grid built from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::cell_ref;

/// Literal token a spreadsheet shows for a type-mismatch error
pub const VALUE_ERROR_TOKEN: &str = "#VALUE!";

/// Content of a single cell, as returned by a value or formula read
///
/// Serialized untagged so a Sheets-style `values` payload
/// (`[["Acme", 12.5, null, true]]`) maps directly onto it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// True for an absent cell or an empty string
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// The string content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True when the cell holds a formula (text starting with `=`)
    pub fn is_formula(&self) -> bool {
        self.as_text().is_some_and(|s| s.starts_with('='))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// A row-major, 0-indexed array of cells covering a declared range
///
/// Rows may be ragged: a short row simply has no cells past its end, and
/// every accessor treats those positions as absent rather than erroring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build a grid from rows of anything convertible into a cell
    ///
    /// ```
    /// use bidlevel_grid::Grid;
    ///
    /// let grid = Grid::from_rows(vec![vec!["", "Item"], vec!["", "Cable"]]);
    /// assert_eq!(grid.text(1, 1), Some("Cable"));
    /// ```
    pub fn from_rows<R, C>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bounds-checked cell lookup
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Text content of a cell, `None` when absent or not text
    pub fn text(&self, row: usize, col: usize) -> Option<&str> {
        self.cell(row, col).and_then(CellValue::as_text)
    }

    /// True when the cell is absent or blank
    pub fn is_blank(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).map_or(true, CellValue::is_blank)
    }

    /// Iterate every present cell as `(row, col, value)`
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &CellValue)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, v)| (r, c, v)))
    }

    /// A1 references of every cell holding `token` verbatim
    pub fn find_text(&self, token: &str) -> Vec<String> {
        self.cells()
            .filter(|(_, _, v)| v.as_text() == Some(token))
            .map(|(r, c, _)| cell_ref(r, c))
            .collect()
    }

    /// Copy out an inclusive sub-rectangle; positions past the data are dropped
    pub fn slice(&self, start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Grid {
        let rows = self
            .rows
            .iter()
            .skip(start_row)
            .take(end_row.saturating_sub(start_row) + 1)
            .map(|row| {
                row.iter()
                    .skip(start_col)
                    .take(end_col.saturating_sub(start_col) + 1)
                    .cloned()
                    .collect()
            })
            .collect();
        Grid { rows }.trimmed()
    }

    /// Drop trailing blank cells in each row and trailing empty rows,
    /// the shape a Sheets `values` response comes back in
    pub fn trimmed(mut self) -> Grid {
        for row in &mut self.rows {
            while row.last().is_some_and(CellValue::is_blank) {
                row.pop();
            }
        }
        while self.rows.last().is_some_and(Vec::is_empty) {
            self.rows.pop();
        }
        self
    }

    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }
}

impl From<Vec<Vec<CellValue>>> for Grid {
    fn from(rows: Vec<Vec<CellValue>>) -> Self {
        Grid::new(rows)
    }
}
