//! Excel/XLSX grid source using calamine.

use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use tracing::{debug, warn};

use crate::address::RangeSpec;
use crate::cell::{CellValue, Grid};
use crate::error::{GridError, Result};
use crate::sources::{GridSource, RenderMode};

/// Excel workbook grid source
pub struct ExcelSource {
    /// Path to the Excel file
    path: String,
    /// Sheet names cache
    sheet_names: Vec<String>,
}

impl ExcelSource {
    /// Create a new Excel source from a file path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();

        if !path.as_ref().exists() {
            return Err(GridError::FileNotFound(path_str));
        }

        let workbook: Xlsx<_> = open_workbook(path.as_ref())
            .map_err(|e: XlsxError| GridError::WorkbookOpen(e.to_string()))?;

        let sheet_names = workbook.sheet_names().to_vec();

        Ok(Self {
            path: path_str,
            sheet_names,
        })
    }

    /// Convert a calamine cell to a grid cell
    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Error(e) => CellValue::Text(e.to_string()),
            Data::DateTime(dt) => CellValue::Text(format!("{}", dt)),
            Data::DateTimeIso(s) => CellValue::Text(s.clone()),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }

    /// Normalise calamine formula text, which is stored without the leading `=`
    fn formula_text(formula: &str) -> Option<String> {
        let formula = formula.trim();
        if formula.is_empty() {
            None
        } else if formula.starts_with('=') {
            Some(formula.to_string())
        } else {
            Some(format!("={}", formula))
        }
    }

    /// Bottom-right absolute position holding data in either layer
    fn used_end(values: &Range<Data>, formulas: Option<&Range<String>>) -> Option<(usize, usize)> {
        values
            .end()
            .into_iter()
            .chain(formulas.and_then(Range::end))
            .map(|(row, col)| (row as usize, col as usize))
            .reduce(|a, b| (a.0.max(b.0), a.1.max(b.1)))
    }

    /// Copy the requested rectangle out of the sheet, using absolute positions
    ///
    /// The rectangle is clipped to the used area first, so an oversized
    /// range costs no more than the data it covers.
    fn extract_range_data(
        values: &Range<Data>,
        formulas: Option<&Range<String>>,
        range: &RangeSpec,
    ) -> Grid {
        let Some((last_row, last_col)) = Self::used_end(values, formulas) else {
            return Grid::default();
        };
        let end_row = range.end.row.min(last_row);
        let end_col = range.end.col.min(last_col);
        if range.start.row > end_row || range.start.col > end_col {
            return Grid::default();
        }

        let mut rows = Vec::with_capacity(end_row - range.start.row + 1);

        for row_idx in range.start.row..=end_row {
            let mut row = Vec::with_capacity(end_col - range.start.col + 1);
            for col_idx in range.start.col..=end_col {
                let pos = (row_idx as u32, col_idx as u32);

                let formula = formulas
                    .and_then(|f| f.get_value(pos))
                    .and_then(|f| Self::formula_text(f));

                let cell = match formula {
                    Some(text) => CellValue::Text(text),
                    None => values
                        .get_value(pos)
                        .map(Self::convert_cell)
                        .unwrap_or_default(),
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Grid::new(rows).trimmed()
    }

    fn resolve_sheet(&self, range: &RangeSpec) -> Result<String> {
        match &range.sheet {
            Some(sheet) => Ok(sheet.clone()),
            None => self
                .default_sheet()
                .ok_or_else(|| GridError::SheetNotFound("No sheets in workbook".to_string())),
        }
    }
}

impl GridSource for ExcelSource {
    fn read_range(&self, range: &RangeSpec, mode: RenderMode) -> Result<Grid> {
        let sheet = self.resolve_sheet(range)?;

        // Re-open workbook for reading (calamine requires this pattern)
        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e: XlsxError| GridError::WorkbookOpen(format!("{}: {}", self.path, e)))?;

        let values = workbook
            .worksheet_range(&sheet)
            .map_err(|e| GridError::SheetNotFound(format!("{}: {}", sheet, e)))?;

        let formulas = match mode {
            RenderMode::Value => None,
            RenderMode::Formula => match workbook.worksheet_formula(&sheet) {
                Ok(formulas) => Some(formulas),
                Err(e) => {
                    // Formula layer may be absent; fall back to literal values
                    warn!(sheet = %sheet, error = %e, "formula layer unavailable");
                    None
                }
            },
        };

        debug!(path = %self.path, range = %range, mode = %mode, "reading excel range");
        Ok(Self::extract_range_data(&values, formulas.as_ref(), range))
    }

    fn list_sheets(&self) -> Result<Vec<String>> {
        Ok(self.sheet_names.clone())
    }

    fn default_sheet(&self) -> Option<String> {
        self.sheet_names.first().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cell() {
        assert_eq!(ExcelSource::convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(
            ExcelSource::convert_cell(&Data::String("hello".to_string())),
            CellValue::from("hello")
        );
        assert_eq!(ExcelSource::convert_cell(&Data::Int(42)), CellValue::Number(42.0));
        assert_eq!(
            ExcelSource::convert_cell(&Data::Float(3.25)),
            CellValue::Number(3.25)
        );
        assert_eq!(ExcelSource::convert_cell(&Data::Bool(true)), CellValue::Bool(true));
    }

    #[test]
    fn test_convert_error_cell_keeps_token() {
        let cell = Data::Error(calamine::CellErrorType::Value);
        assert_eq!(ExcelSource::convert_cell(&cell), CellValue::from("#VALUE!"));
    }

    #[test]
    fn test_formula_text() {
        assert_eq!(
            ExcelSource::formula_text("D4*E4"),
            Some("=D4*E4".to_string())
        );
        assert_eq!(
            ExcelSource::formula_text("=SUM(F4:F26)"),
            Some("=SUM(F4:F26)".to_string())
        );
        assert_eq!(ExcelSource::formula_text("  "), None);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ExcelSource::new("/nonexistent/bids.xlsx"),
            Err(GridError::FileNotFound(_))
        ));
    }
}
