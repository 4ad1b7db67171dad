//! Template layouts
//!
//! Every positional constant the extractor relies on lives in a
//! [`TemplateLayout`]. New spreadsheet templates are added as new layouts
//! (built in, or loaded from TOML) keyed by template id, never as new code
//! paths.
//!
//! All row and column indices are 0-based positions in the grid read from
//! [`TemplateLayout::read_range`]; A1 strings are only used for labels and
//! explicit cell lists.

use std::collections::BTreeMap;

use bidlevel_grid::{CellRef, RangeSpec};
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Identifier of the built-in bid comparison template
pub const TEMPLATE_1: &str = "template-1";

/// Column offsets inside a supplier block
pub const PRICE_OFFSET: usize = 0;
pub const QUANTITY_OFFSET: usize = 1;
pub const TOTAL_OFFSET: usize = 2;

/// Positional description of one spreadsheet template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLayout {
    /// Key used to select this layout and its evaluator suite
    pub template_id: String,
    /// Sheet holding the comparison
    pub sheet_name: String,
    /// Range read (twice) for extraction, in A1 notation
    pub read_range: String,
    pub suppliers: SupplierLayout,
    pub items: ItemLayout,
    pub totals: TotalsLayout,
    pub formulas: FormulaLayout,
    /// Regions that must stay empty (apart from a tolerated string)
    #[serde(default)]
    pub regions: Vec<RegionSpec>,
    /// Nominal bounding box of valid data, reported in the record metadata
    pub valid_data_range: DataBounds,
}

/// Where supplier blocks start and how they repeat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierLayout {
    /// Row holding supplier names
    pub header_row: usize,
    /// Column of the first supplier's block
    pub start_col: usize,
    /// Columns between consecutive blocks (block width)
    pub stride: usize,
    /// Column-header label that is never a supplier name
    pub price_sentinel: String,
    /// Substring marking an unfilled placeholder name
    pub placeholder_marker: String,
}

impl SupplierLayout {
    /// First column of supplier block `index`
    pub fn block_start(&self, index: usize) -> usize {
        self.start_col + index * self.stride
    }

    /// Total column (last of the block) for supplier `index`
    pub fn total_col(&self, index: usize) -> usize {
        self.block_start(index) + TOTAL_OFFSET
    }
}

/// Line-item body of the template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemLayout {
    /// First item row (inclusive)
    pub first_row: usize,
    /// Row after the last item row (exclusive)
    pub end_row: usize,
    pub name_col: usize,
    pub description_col: usize,
}

/// Rows of the per-supplier totals block, read at each supplier's total column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsLayout {
    pub subtotal_row: usize,
    pub tax_rate_row: usize,
    pub tax_amount_row: usize,
    pub shipping_row: usize,
    pub final_total_row: usize,
}

impl TotalsLayout {
    /// Grid height needed before the totals block is read at all
    pub fn required_rows(&self) -> usize {
        [
            self.subtotal_row,
            self.tax_rate_row,
            self.tax_amount_row,
            self.shipping_row,
            self.final_total_row,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

/// Cells that must keep their formulas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaLayout {
    /// Number of supplier slots the template provides
    pub slots: usize,
    pub groups: Vec<FormulaGroupSpec>,
}

/// A named set of rows checked at every slot's total column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaGroupSpec {
    pub name: String,
    /// First row (inclusive)
    pub first_row: usize,
    /// Last row (inclusive)
    pub last_row: usize,
}

/// A template region expected to be empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub name: String,
    /// Human-readable A1 label, e.g. `A32:U100`
    pub label: String,
    pub shape: RegionShape,
    /// The one string this region may legitimately contain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerated: Option<String>,
}

/// Geometry of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionShape {
    /// One row, columns `0..end_col` (whole row when unbounded)
    Row {
        row: usize,
        #[serde(default)]
        end_col: Option<usize>,
    },
    /// One column, rows `0..end_row` (whole column when unbounded)
    Column {
        col: usize,
        #[serde(default)]
        end_row: Option<usize>,
    },
    /// Every row from `row` on, columns `0..end_col`
    RowsFrom {
        row: usize,
        #[serde(default)]
        end_col: Option<usize>,
    },
    /// Every column from `col` on, in every row
    ColumnsFrom { col: usize },
    /// An explicit list of A1 cells
    Cells { cells: Vec<String> },
}

/// Bounding box of the valid data, as reported in record metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBounds {
    pub start_row: usize,
    pub end_row: usize,
    pub start_col: String,
    pub end_col: String,
}

impl TemplateLayout {
    /// The built-in "template-1" bid comparison layout
    ///
    /// Suppliers sit in 3-column blocks starting at D on row 2, items on rows
    /// 4-26, and the totals block on rows 27-31 of the "Bid Comparison" sheet.
    pub fn template_1() -> Self {
        Self {
            template_id: TEMPLATE_1.to_string(),
            sheet_name: "Bid Comparison".to_string(),
            read_range: "Bid Comparison!A1:Z100".to_string(),
            suppliers: SupplierLayout {
                header_row: 1,
                start_col: 3,
                stride: 3,
                price_sentinel: "PRICE".to_string(),
                placeholder_marker: "[BID NAME".to_string(),
            },
            items: ItemLayout {
                first_row: 3,
                end_row: 26,
                name_col: 1,
                description_col: 2,
            },
            totals: TotalsLayout {
                subtotal_row: 26,
                tax_rate_row: 27,
                tax_amount_row: 28,
                shipping_row: 29,
                final_total_row: 30,
            },
            formulas: FormulaLayout {
                slots: 5,
                groups: vec![
                    FormulaGroupSpec {
                        name: "item_totals".to_string(),
                        first_row: 3,
                        last_row: 25,
                    },
                    FormulaGroupSpec {
                        name: "subtotals".to_string(),
                        first_row: 26,
                        last_row: 26,
                    },
                    FormulaGroupSpec {
                        name: "tax_totals".to_string(),
                        first_row: 28,
                        last_row: 28,
                    },
                    FormulaGroupSpec {
                        name: "final_totals".to_string(),
                        first_row: 30,
                        last_row: 30,
                    },
                ],
            },
            regions: vec![
                RegionSpec {
                    name: "first_row".to_string(),
                    label: "A1:U1".to_string(),
                    shape: RegionShape::Row {
                        row: 0,
                        end_col: Some(21),
                    },
                    tolerated: Some("BID COMPARISON TEMPLATE".to_string()),
                },
                RegionSpec {
                    name: "first_column".to_string(),
                    label: "A1:A34".to_string(),
                    shape: RegionShape::Column {
                        col: 0,
                        end_row: Some(34),
                    },
                    tolerated: None,
                },
                RegionSpec {
                    name: "rows_after_32".to_string(),
                    label: "A32:U100".to_string(),
                    shape: RegionShape::RowsFrom {
                        row: 31,
                        end_col: Some(21),
                    },
                    tolerated: Some("CLICK HERE TO CREATE IN SMARTSHEET".to_string()),
                },
                RegionSpec {
                    name: "columns_after_U".to_string(),
                    label: "V1:Z100".to_string(),
                    shape: RegionShape::ColumnsFrom { col: 21 },
                    tolerated: None,
                },
                RegionSpec {
                    name: "title_whitespace".to_string(),
                    label: "E2,F2,H2,I2,K2,L2,N2,O2,Q2,R2,T2,U2".to_string(),
                    shape: RegionShape::Cells {
                        cells: [
                            "E2", "F2", "H2", "I2", "K2", "L2", "N2", "O2", "Q2", "R2", "T2",
                            "U2",
                        ]
                        .iter()
                        .map(|c| c.to_string())
                        .collect(),
                    },
                    tolerated: None,
                },
            ],
            valid_data_range: DataBounds {
                start_row: 3,
                end_row: 31,
                start_col: "A".to_string(),
                end_col: "U".to_string(),
            },
        }
    }

    /// Parse a single layout from TOML
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let layout: TemplateLayout = toml::from_str(toml_str)?;
        layout.validate()?;
        Ok(layout)
    }

    /// The parsed read range
    pub fn range(&self) -> Result<RangeSpec> {
        RangeSpec::parse(&self.read_range).map_err(|source| ExtractError::Reference {
            template: self.template_id.clone(),
            source,
        })
    }

    /// Check the layout is internally consistent
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| ExtractError::InvalidLayout {
            template: self.template_id.clone(),
            reason,
        };

        if self.template_id.trim().is_empty() {
            return Err(invalid("template_id must not be empty".to_string()));
        }
        if self.suppliers.stride <= TOTAL_OFFSET {
            return Err(invalid(format!(
                "supplier stride {} is narrower than a price/quantity/total block",
                self.suppliers.stride
            )));
        }
        if self.items.first_row > self.items.end_row {
            return Err(invalid(format!(
                "item rows start ({}) after they end ({})",
                self.items.first_row, self.items.end_row
            )));
        }
        for group in &self.formulas.groups {
            if group.first_row > group.last_row {
                return Err(invalid(format!(
                    "formula group '{}' starts after it ends",
                    group.name
                )));
            }
        }

        self.range()?;
        for region in &self.regions {
            if let RegionShape::Cells { cells } = &region.shape {
                for cell in cells {
                    cell.parse::<CellRef>()
                        .map_err(|source| ExtractError::Reference {
                            template: self.template_id.clone(),
                            source,
                        })?;
                }
            }
        }

        Ok(())
    }
}

/// Layouts keyed by template id
///
/// Built once at startup and then only read.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: BTreeMap<String, TemplateLayout>,
}

impl LayoutRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in layouts
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let layout = TemplateLayout::template_1();
        registry.layouts.insert(layout.template_id.clone(), layout);
        registry
    }

    /// Add a layout, replacing any layout with the same id
    pub fn register(&mut self, layout: TemplateLayout) -> Result<()> {
        layout.validate()?;
        self.layouts.insert(layout.template_id.clone(), layout);
        Ok(())
    }

    pub fn get(&self, template_id: &str) -> Option<&TemplateLayout> {
        self.layouts.get(template_id)
    }

    pub fn template_ids(&self) -> Vec<&str> {
        self.layouts.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_1_is_valid() {
        let layout = TemplateLayout::template_1();
        assert!(layout.validate().is_ok());
        assert_eq!(layout.template_id, TEMPLATE_1);
    }

    #[test]
    fn test_supplier_block_columns() {
        let suppliers = TemplateLayout::template_1().suppliers;
        assert_eq!(suppliers.block_start(0), 3);
        assert_eq!(suppliers.block_start(2), 9);
        // F, I, L, O, R
        let totals: Vec<usize> = (0..5).map(|i| suppliers.total_col(i)).collect();
        assert_eq!(totals, vec![5, 8, 11, 14, 17]);
    }

    #[test]
    fn test_totals_required_rows() {
        assert_eq!(TemplateLayout::template_1().totals.required_rows(), 31);
    }

    #[test]
    fn test_toml_round_trip() {
        let layout = TemplateLayout::template_1();
        let text = toml::to_string(&layout).unwrap();
        let parsed = TemplateLayout::from_toml_str(&text).unwrap();
        assert_eq!(parsed, layout);
    }

    #[test]
    fn test_toml_region_shapes() {
        let mut layout = TemplateLayout::template_1();
        layout.template_id = "template-2".to_string();
        layout.regions = vec![RegionSpec {
            name: "footer".to_string(),
            label: "A40:U40".to_string(),
            shape: RegionShape::Row {
                row: 39,
                end_col: None,
            },
            tolerated: None,
        }];
        let text = toml::to_string(&layout).unwrap();
        assert!(text.contains("kind = \"row\""));
        let parsed = TemplateLayout::from_toml_str(&text).unwrap();
        assert_eq!(parsed.regions, layout.regions);
    }

    #[test]
    fn test_invalid_stride() {
        let mut layout = TemplateLayout::template_1();
        layout.suppliers.stride = 2;
        assert!(matches!(layout.validate(), Err(ExtractError::InvalidLayout { .. })));
    }

    #[test]
    fn test_invalid_region_cell() {
        let mut layout = TemplateLayout::template_1();
        layout.regions.push(RegionSpec {
            name: "bad".to_string(),
            label: "?".to_string(),
            shape: RegionShape::Cells {
                cells: vec!["2E".to_string()],
            },
            tolerated: None,
        });
        assert!(matches!(
            layout.validate(),
            Err(ExtractError::Reference { .. })
        ));
    }

    #[test]
    fn test_registry() {
        let mut registry = LayoutRegistry::with_defaults();
        assert_eq!(registry.template_ids(), vec![TEMPLATE_1]);

        let mut custom = TemplateLayout::template_1();
        custom.template_id = "template-2".to_string();
        custom.suppliers.start_col = 4;
        registry.register(custom).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("template-2").unwrap().suppliers.start_col, 4);
        assert!(registry.get("template-9").is_none());
    }
}
