//! The structured record produced by one extraction.
//!
//! Pure data: nothing in here refers back to the source grid. Every
//! collection defaults to empty on deserialization so a partial record saved
//! by an older run still loads, and evaluators can report what is missing.

use bidlevel_grid::{CellValue, Grid};
use serde::{Deserialize, Serialize};

use crate::layout::DataBounds;

/// Result of extracting one bid comparison sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedRecord {
    /// Layout the record was extracted with
    pub template_id: String,
    pub metadata: Metadata,
    /// Contents of the regions that must stay empty
    pub empty_regions: Vec<EmptyRegionCheck>,
    /// Contents of the cells that must hold formulas
    pub formula_checks: Vec<FormulaCheck>,
    /// Line items that carry at least one bid
    pub items: Vec<Item>,
    /// Per-supplier totals, in supplier order
    pub totals: Vec<SupplierTotals>,
    /// Full value grid as read; `None` only for records saved without it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<Grid>,
}

impl ExtractedRecord {
    /// Look up a region check by name
    pub fn region(&self, name: &str) -> Option<&EmptyRegionCheck> {
        self.empty_regions.iter().find(|r| r.name == name)
    }

    /// Look up a formula group by name
    pub fn formula_check(&self, name: &str) -> Option<&FormulaCheck> {
        self.formula_checks.iter().find(|f| f.name == name)
    }

    /// Totals for one supplier
    pub fn supplier_totals(&self, supplier: &str) -> Option<&SupplierTotals> {
        self.totals.iter().find(|t| t.supplier == supplier)
    }
}

/// Record metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub sheet_name: String,
    pub total_suppliers: usize,
    /// Supplier names, left to right
    pub supplier_names: Vec<String>,
    pub valid_data_range: Option<DataBounds>,
}

/// One cell of a region, copied verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionCell {
    /// A1 reference
    pub cell: String,
    pub value: CellValue,
}

/// A named template region and what was found in it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmptyRegionCheck {
    pub name: String,
    /// A1 label of the region
    pub range: String,
    /// The one string the region may contain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerated: Option<String>,
    pub cells: Vec<RegionCell>,
}

impl EmptyRegionCheck {
    /// Non-blank cells other than the tolerated string
    pub fn unexpected(&self) -> impl Iterator<Item = &RegionCell> {
        self.cells.iter().filter(move |c| {
            !c.value.is_blank() && c.value.as_text() != self.tolerated.as_deref()
        })
    }
}

/// One cell expected to hold a formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaCell {
    /// A1 reference
    pub cell: String,
    /// Content read in formula mode
    pub content: CellValue,
}

/// A named group of formula cells
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaCheck {
    pub name: String,
    pub cells: Vec<FormulaCell>,
}

/// Unparsed cell contents behind a bid
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBid {
    pub price: CellValue,
    pub quantity: CellValue,
    pub total: CellValue,
}

/// One supplier's quote for one item
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Bid {
    pub supplier: String,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
    pub total: Option<f64>,
    pub raw_values: RawBid,
}

impl Bid {
    /// A bid is present when any of its figures parsed
    pub fn is_present(&self) -> bool {
        self.price.is_some() || self.quantity.is_some() || self.total.is_some()
    }
}

/// One line of the comparison body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// 1-based sheet row
    pub row_index: usize,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Number of retained bids
    pub bid_count: usize,
    pub bids: Vec<Bid>,
}

/// Totals block for one supplier
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierTotals {
    pub supplier: String,
    pub subtotal: Option<f64>,
    pub tax_rate: Option<f64>,
    pub tax_amount: Option<f64>,
    pub shipping: Option<f64>,
    pub final_total: Option<f64>,
}
