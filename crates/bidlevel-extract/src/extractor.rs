//! Positional extraction of a bid comparison grid.
//!
//! The [`Extractor`] walks a value grid and its formula twin using nothing
//! but the offsets of one [`TemplateLayout`]. Every read is bounds-checked:
//! a short row, a missing row or an unparsable number only ever degrades the
//! affected field to empty.

use bidlevel_grid::{cell_ref, CellValue, Grid};
use tracing::{debug, info, warn};

use crate::currency::parse_optional_amount;
use crate::layout::{
    FormulaGroupSpec, RegionShape, RegionSpec, TemplateLayout, PRICE_OFFSET, QUANTITY_OFFSET,
    TOTAL_OFFSET,
};
use crate::record::{
    Bid, EmptyRegionCheck, ExtractedRecord, FormulaCell, FormulaCheck, Item, Metadata, RawBid,
    RegionCell, SupplierTotals,
};

/// Extracts [`ExtractedRecord`]s according to one layout
///
/// Holds no state besides the layout, so repeated calls on the same grids
/// return identical records.
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'a> {
    layout: &'a TemplateLayout,
}

impl<'a> Extractor<'a> {
    pub fn new(layout: &'a TemplateLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &TemplateLayout {
        self.layout
    }

    /// Build the record for one value grid and the formula grid of the same range
    pub fn extract(&self, values: &Grid, formulas: &Grid) -> ExtractedRecord {
        let suppliers = self.discover_suppliers(values);
        info!(
            template = %self.layout.template_id,
            suppliers = suppliers.len(),
            "Discovered suppliers"
        );

        let items = self.extract_items(values, &suppliers);
        let totals = self.extract_totals(values, &suppliers);
        debug!(items = items.len(), totals = totals.len(), "Extraction complete");

        ExtractedRecord {
            template_id: self.layout.template_id.clone(),
            metadata: Metadata {
                sheet_name: self.layout.sheet_name.clone(),
                total_suppliers: suppliers.len(),
                supplier_names: suppliers.clone(),
                valid_data_range: Some(self.layout.valid_data_range.clone()),
            },
            empty_regions: self.check_regions(values),
            formula_checks: self.check_formulas(formulas),
            items,
            totals,
            sheet: Some(values.clone()),
        }
    }

    /// Scan the header row block by block, left to right
    ///
    /// Blank cells, the price column label and placeholder names are skipped
    /// without ending the scan; the scan stops where the row ends. The
    /// returned order is the supplier order: the n-th name owns block n.
    pub fn discover_suppliers(&self, values: &Grid) -> Vec<String> {
        let spec = &self.layout.suppliers;
        if spec.stride == 0 {
            warn!(
                template = %self.layout.template_id,
                "Supplier stride is zero, no blocks to scan"
            );
            return Vec::new();
        }
        let Some(header) = values.row(spec.header_row) else {
            return Vec::new();
        };

        let mut suppliers = Vec::new();
        let mut block = 0;
        while spec.block_start(block) < header.len() {
            let cell = &header[spec.block_start(block)];
            match cell_string(cell) {
                Some(name)
                    if name != spec.price_sentinel
                        && !name.contains(spec.placeholder_marker.as_str()) =>
                {
                    debug!(supplier = %name, block, "Supplier header");
                    suppliers.push(name);
                }
                Some(name) => debug!(header = %name, block, "Skipping non-supplier header"),
                None => {}
            }
            block += 1;
        }
        suppliers
    }

    /// Read every non-empty item row, keeping items with at least one bid
    pub fn extract_items(&self, values: &Grid, suppliers: &[String]) -> Vec<Item> {
        let spec = &self.layout.items;
        let end = spec.end_row.min(values.row_count());

        let mut items = Vec::new();
        for row in spec.first_row..end {
            let Some(cells) = values.row(row) else {
                continue;
            };
            if cells.iter().all(CellValue::is_blank) {
                continue;
            }

            let bids: Vec<Bid> = suppliers
                .iter()
                .enumerate()
                .map(|(index, supplier)| self.read_bid(values, row, index, supplier))
                .filter(Bid::is_present)
                .collect();

            if bids.is_empty() {
                debug!(row = row + 1, "Dropping item without bids");
                continue;
            }

            debug!(row = row + 1, bids = bids.len(), "Item");
            items.push(Item {
                row_index: row + 1,
                name: values.cell(row, spec.name_col).and_then(cell_string),
                description: values.cell(row, spec.description_col).and_then(cell_string),
                bid_count: bids.len(),
                bids,
            });
        }
        items
    }

    fn read_bid(&self, values: &Grid, row: usize, index: usize, supplier: &str) -> Bid {
        let start = self.layout.suppliers.block_start(index);
        let raw = |offset: usize| values.cell(row, start + offset).cloned().unwrap_or_default();
        let raw_values = RawBid {
            price: raw(PRICE_OFFSET),
            quantity: raw(QUANTITY_OFFSET),
            total: raw(TOTAL_OFFSET),
        };

        Bid {
            supplier: supplier.to_string(),
            price: parse_optional_amount(Some(&raw_values.price)),
            quantity: parse_optional_amount(Some(&raw_values.quantity)),
            total: parse_optional_amount(Some(&raw_values.total)),
            raw_values,
        }
    }

    /// Per-supplier totals block
    ///
    /// Returns nothing when the grid does not reach the last totals row.
    pub fn extract_totals(
        &self,
        values: &Grid,
        suppliers: &[String],
    ) -> Vec<SupplierTotals> {
        let spec = &self.layout.totals;
        if values.row_count() < spec.required_rows() {
            debug!(
                rows = values.row_count(),
                required = spec.required_rows(),
                "Grid too short for totals block"
            );
            return Vec::new();
        }

        suppliers
            .iter()
            .enumerate()
            .map(|(index, supplier)| {
                let col = self.layout.suppliers.total_col(index);
                let amount = |row: usize| parse_optional_amount(values.cell(row, col));
                SupplierTotals {
                    supplier: supplier.clone(),
                    subtotal: amount(spec.subtotal_row),
                    tax_rate: amount(spec.tax_rate_row),
                    tax_amount: amount(spec.tax_amount_row),
                    shipping: amount(spec.shipping_row),
                    final_total: amount(spec.final_total_row),
                }
            })
            .collect()
    }

    /// Copy the content of every layout region, verbatim
    pub fn check_regions(&self, values: &Grid) -> Vec<EmptyRegionCheck> {
        self.layout
            .regions
            .iter()
            .map(|region| EmptyRegionCheck {
                name: region.name.clone(),
                range: region.label.clone(),
                tolerated: region.tolerated.clone(),
                cells: region_cells(values, region),
            })
            .collect()
    }

    /// Copy the formula-mode content of every expected formula cell
    ///
    /// Cells are listed slot by slot, top to bottom within a slot.
    pub fn check_formulas(&self, formulas: &Grid) -> Vec<FormulaCheck> {
        self.layout
            .formulas
            .groups
            .iter()
            .map(|group| FormulaCheck {
                name: group.name.clone(),
                cells: self.formula_cells(formulas, group),
            })
            .collect()
    }

    fn formula_cells(&self, formulas: &Grid, group: &FormulaGroupSpec) -> Vec<FormulaCell> {
        let mut cells = Vec::new();
        for slot in 0..self.layout.formulas.slots {
            let col = self.layout.suppliers.total_col(slot);
            for row in group.first_row..=group.last_row {
                cells.push(FormulaCell {
                    cell: cell_ref(row, col),
                    content: formulas.cell(row, col).cloned().unwrap_or_default(),
                });
            }
        }
        cells
    }
}

/// Trimmed display text of a non-blank cell
fn cell_string(cell: &CellValue) -> Option<String> {
    let text = cell.to_string();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn region_cells(values: &Grid, region: &RegionSpec) -> Vec<RegionCell> {
    let present = |row: usize, col: usize| {
        values.cell(row, col).map(|value| RegionCell {
            cell: cell_ref(row, col),
            value: value.clone(),
        })
    };
    let row_width = |row: usize| values.row(row).map_or(0, <[CellValue]>::len);

    match &region.shape {
        RegionShape::Row { row, end_col } => {
            let end = end_col.map_or(row_width(*row), |e| e.min(row_width(*row)));
            (0..end).filter_map(|col| present(*row, col)).collect()
        }
        RegionShape::Column { col, end_row } => {
            let end = end_row.map_or(values.row_count(), |e| e.min(values.row_count()));
            (0..end).filter_map(|row| present(row, *col)).collect()
        }
        RegionShape::RowsFrom { row, end_col } => (*row..values.row_count())
            .flat_map(|r| {
                let end = end_col.map_or(row_width(r), |e| e.min(row_width(r)));
                (0..end).filter_map(move |col| present(r, col))
            })
            .collect(),
        RegionShape::ColumnsFrom { col } => (0..values.row_count())
            .flat_map(|r| (*col..row_width(r)).filter_map(move |c| present(r, c)))
            .collect(),
        RegionShape::Cells { cells } => cells
            .iter()
            .filter_map(|cell| cell.parse::<bidlevel_grid::CellRef>().ok())
            .map(|at| RegionCell {
                cell: cell_ref(at.row, at.col),
                value: values.cell(at.row, at.col).cloned().unwrap_or_default(),
            })
            .collect(),
    }
}
