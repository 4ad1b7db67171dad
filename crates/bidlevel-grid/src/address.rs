//! A1-notation addressing: columns, cell references and ranges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Convert column letters to a 0-indexed number (A=0, B=1, ..., Z=25, AA=26)
pub fn column_to_index(col: &str) -> Result<usize> {
    let col = col.trim();
    if col.is_empty() {
        return Err(GridError::InvalidRange("Empty column reference".to_string()));
    }

    let mut result: usize = 0;
    for c in col.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(GridError::InvalidRange(format!(
                "Invalid character '{}' in column '{}'",
                c, col
            )));
        }
        let value = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        result = result
            .checked_mul(26)
            .and_then(|r| r.checked_add(value))
            .ok_or_else(|| GridError::InvalidRange(format!("Column '{}' is too large", col)))?;
    }
    Ok(result - 1)
}

/// Convert a 0-indexed column number back to letters (0=A, 25=Z, 26=AA)
pub fn index_to_column(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Format a 0-indexed (row, col) position as an A1 reference ("B7")
pub fn cell_ref(row: usize, col: usize) -> String {
    format!("{}{}", index_to_column(col), row + 1)
}

/// A single cell position, 0-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&cell_ref(self.row, self.col))
    }
}

impl FromStr for CellRef {
    type Err = GridError;

    /// Parse a cell reference like "A1" (case-insensitive, `$` anchors ignored)
    fn from_str(cell: &str) -> Result<Self> {
        let cell: String = cell.trim().chars().filter(|c| *c != '$').collect();

        if cell.is_empty() {
            return Err(GridError::InvalidRange("Empty cell reference".to_string()));
        }

        let split = cell
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| GridError::InvalidRange(format!("Invalid cell reference '{}'", cell)))?;
        let (col_str, row_str) = cell.split_at(split);

        if col_str.is_empty() || !row_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(GridError::InvalidRange(format!(
                "Invalid cell reference '{}'",
                cell
            )));
        }

        let col = column_to_index(col_str)?;
        let row: usize = row_str
            .parse()
            .map_err(|_| GridError::InvalidRange(format!("Invalid row number '{}'", row_str)))?;

        if row == 0 {
            return Err(GridError::InvalidRange(
                "Row number must be >= 1".to_string(),
            ));
        }

        Ok(CellRef::new(row - 1, col))
    }
}

/// A rectangular range with an optional sheet name, e.g. `Bid Comparison!A1:U34`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub sheet: Option<String>,
    pub start: CellRef,
    pub end: CellRef,
}

impl RangeSpec {
    /// Parse a range in A1 notation
    ///
    /// Accepts `A1:C10`, `Sheet1!A1:C10` and `'My Sheet'!A1:C10`. A single
    /// cell (`B2`) is treated as a one-cell range.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();

        let (sheet, cells) = match spec.rfind('!') {
            Some(pos) => {
                let raw_sheet = spec[..pos].trim();
                let sheet = raw_sheet
                    .strip_prefix('\'')
                    .and_then(|s| s.strip_suffix('\''))
                    .map(|s| s.replace("''", "'"))
                    .unwrap_or_else(|| raw_sheet.to_string());
                if sheet.is_empty() {
                    return Err(GridError::InvalidRange(format!(
                        "Empty sheet name in '{}'",
                        spec
                    )));
                }
                (Some(sheet), &spec[pos + 1..])
            }
            None => (None, spec),
        };

        let parts: Vec<&str> = cells.split(':').collect();
        let (start, end) = match parts.as_slice() {
            [single] => {
                let cell: CellRef = single.parse()?;
                (cell, cell)
            }
            [start, end] => (start.parse()?, end.parse()?),
            _ => {
                return Err(GridError::InvalidRange(format!(
                    "Expected format 'A1:B2', got '{}'",
                    spec
                )))
            }
        };

        // Normalise reversed corners (e.g. "C3:A1")
        let top_left = CellRef::new(start.row.min(end.row), start.col.min(end.col));
        let bottom_right = CellRef::new(start.row.max(end.row), start.col.max(end.col));

        Ok(Self {
            sheet,
            start: top_left,
            end: bottom_right,
        })
    }

    /// Number of rows covered by the range
    pub fn height(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    /// Number of columns covered by the range
    pub fn width(&self) -> usize {
        self.end.col - self.start.col + 1
    }

    /// Same cells, different sheet
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

impl FromStr for RangeSpec {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        RangeSpec::parse(s)
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sheet) = &self.sheet {
            if sheet.contains(' ') || sheet.contains('\'') || sheet.contains('!') {
                write!(f, "'{}'!", sheet.replace('\'', "''"))?;
            } else {
                write!(f, "{}!", sheet)?;
            }
        }
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_index() {
        assert_eq!(column_to_index("A").unwrap(), 0);
        assert_eq!(column_to_index("B").unwrap(), 1);
        assert_eq!(column_to_index("Z").unwrap(), 25);
        assert_eq!(column_to_index("AA").unwrap(), 26);
        assert_eq!(column_to_index("AZ").unwrap(), 51);
        assert_eq!(column_to_index("BA").unwrap(), 52);
        assert_eq!(column_to_index("u").unwrap(), 20);
    }

    #[test]
    fn test_column_to_index_invalid() {
        assert!(column_to_index("").is_err());
        assert!(column_to_index("A1").is_err());
    }

    #[test]
    fn test_index_to_column() {
        assert_eq!(index_to_column(0), "A");
        assert_eq!(index_to_column(5), "F");
        assert_eq!(index_to_column(25), "Z");
        assert_eq!(index_to_column(26), "AA");
        assert_eq!(index_to_column(52), "BA");
        assert_eq!(index_to_column(701), "ZZ");
        assert_eq!(index_to_column(702), "AAA");
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!("A1".parse::<CellRef>().unwrap(), CellRef::new(0, 0));
        assert_eq!("B2".parse::<CellRef>().unwrap(), CellRef::new(1, 1));
        assert_eq!("AB10".parse::<CellRef>().unwrap(), CellRef::new(9, 27));
        assert_eq!("$F$31".parse::<CellRef>().unwrap(), CellRef::new(30, 5));
        assert_eq!("e2".parse::<CellRef>().unwrap(), CellRef::new(1, 4));
    }

    #[test]
    fn test_parse_cell_ref_invalid() {
        assert!("".parse::<CellRef>().is_err());
        assert!("A0".parse::<CellRef>().is_err());
        assert!("12".parse::<CellRef>().is_err());
        assert!("A1B".parse::<CellRef>().is_err());
    }

    #[test]
    fn test_cell_ref_display() {
        assert_eq!(CellRef::new(6, 1).to_string(), "B7");
        assert_eq!(cell_ref(30, 17), "R31");
    }

    #[test]
    fn test_parse_range_with_sheet() {
        let range = RangeSpec::parse("Bid Comparison!A1:U34").unwrap();
        assert_eq!(range.sheet.as_deref(), Some("Bid Comparison"));
        assert_eq!(range.start, CellRef::new(0, 0));
        assert_eq!(range.end, CellRef::new(33, 20));
        assert_eq!(range.height(), 34);
        assert_eq!(range.width(), 21);
    }

    #[test]
    fn test_parse_range_quoted_sheet() {
        let range = RangeSpec::parse("'Bid ''A'' Sheet'!B2:C3").unwrap();
        assert_eq!(range.sheet.as_deref(), Some("Bid 'A' Sheet"));
        assert_eq!(range.to_string(), "'Bid ''A'' Sheet'!B2:C3");
    }

    #[test]
    fn test_parse_range_without_sheet() {
        let range = RangeSpec::parse("a1:c10").unwrap();
        assert_eq!(range.sheet, None);
        assert_eq!(range.to_string(), "A1:C10");
    }

    #[test]
    fn test_parse_range_reversed_corners() {
        let range = RangeSpec::parse("C3:A1").unwrap();
        assert_eq!(range.start, CellRef::new(0, 0));
        assert_eq!(range.end, CellRef::new(2, 2));
    }

    #[test]
    fn test_parse_range_single_cell() {
        let range = RangeSpec::parse("Sheet1!E2").unwrap();
        assert_eq!(range.start, range.end);
    }

    #[test]
    fn test_parse_range_invalid() {
        assert!(RangeSpec::parse("").is_err());
        assert!(RangeSpec::parse("A1:B2:C3").is_err());
        assert!(RangeSpec::parse("!A1:B2").is_err());
    }
}
