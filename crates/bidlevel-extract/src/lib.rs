//! # bidlevel-extract
//!
//! Turns a bid comparison sheet into a typed [`ExtractedRecord`].
//!
//! ## Features
//!
//! - **Table-driven layouts**: every row, column and stride lives in a
//!   [`TemplateLayout`], registered by template id in a [`LayoutRegistry`]
//! - **Forgiving numbers**: currency symbols, thousands separators and decimal
//!   commas are handled by [`currency`]; anything unparsable becomes `None`
//! - **Verbatim checks**: region and formula cells are copied as found, for
//!   evaluators to judge
//!
//! ## Example
//!
//! ```rust,ignore
//! use bidlevel_extract::{extract_from_source, TemplateLayout};
//! use bidlevel_grid::ExcelSource;
//!
//! let source = ExcelSource::new("bids.xlsx")?;
//! let record = extract_from_source(&source, &TemplateLayout::template_1(), None)?;
//! println!("{} suppliers", record.metadata.total_suppliers);
//! ```

pub mod currency;
pub mod error;
pub mod extractor;
pub mod layout;
pub mod record;

// Re-exports
pub use currency::{clean_currency_text, parse_amount};
pub use error::{ExtractError, Result};
pub use extractor::Extractor;
pub use layout::{
    DataBounds, FormulaGroupSpec, LayoutRegistry, RegionShape, RegionSpec, TemplateLayout,
    TEMPLATE_1,
};
pub use record::{
    Bid, EmptyRegionCheck, ExtractedRecord, FormulaCell, FormulaCheck, Item, Metadata, RawBid,
    RegionCell, SupplierTotals,
};

use bidlevel_grid::{Grid, GridError, GridSource, RangeSpec, RenderMode};
use tracing::{debug, warn};

/// Extract with the built-in `template-1` layout
pub fn extract(values: &Grid, formulas: &Grid) -> ExtractedRecord {
    let layout = TemplateLayout::template_1();
    Extractor::new(&layout).extract(values, formulas)
}

/// Read the layout's range twice (values, then formulas) and extract
///
/// `range` overrides the layout's read range. A source without a formula
/// layer (CSV) is extracted with an empty formula grid, so every formula
/// check comes back blank.
pub fn extract_from_source(
    source: &dyn GridSource,
    layout: &TemplateLayout,
    range: Option<&RangeSpec>,
) -> Result<ExtractedRecord> {
    let range = match range {
        Some(range) => range.clone(),
        None => layout.range()?,
    };
    debug!(range = %range, template = %layout.template_id, "Reading grids");

    let values = source.read_range(&range, RenderMode::Value)?;
    let formulas = match source.read_range(&range, RenderMode::Formula) {
        Ok(formulas) => formulas,
        Err(GridError::UnsupportedRenderMode { source_kind, .. }) => {
            warn!(source_kind, "Source has no formula layer; formula checks will be empty");
            Grid::default()
        }
        Err(e) => return Err(e.into()),
    };
    Ok(Extractor::new(layout).extract(&values, &formulas))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_empty_grids() {
        let record = extract(&Grid::default(), &Grid::default());
        assert_eq!(record.template_id, TEMPLATE_1);
        assert_eq!(record.metadata.sheet_name, "Bid Comparison");
        assert!(record.items.is_empty());
        assert!(record.totals.is_empty());
        assert_eq!(record.empty_regions.len(), 5);
        assert_eq!(record.formula_checks.len(), 4);
    }

    #[test]
    fn test_extract_from_csv_without_formulas() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, ",,,\n,,,Acme\n,,,\n,Cable,,12").unwrap();
        let source = bidlevel_grid::CsvSource::new(file.path()).unwrap();

        let record = extract_from_source(&source, &TemplateLayout::template_1(), None).unwrap();
        assert_eq!(record.metadata.supplier_names, vec!["Acme"]);
        assert_eq!(record.items[0].bids[0].price, Some(12.0));
        assert!(record.formula_checks[0].cells.iter().all(|c| c.content.is_blank()));
    }
}
