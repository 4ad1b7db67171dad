//! The built-in evaluators.
//!
//! Each one reads only the [`ExtractedRecord`](bidlevel_extract::ExtractedRecord)
//! and the request inputs, and reports every violation it finds.

pub mod formulas;
pub mod items;
pub mod line_items;
pub mod regions;
pub mod suppliers;
pub mod value_errors;

pub use formulas::FormulaComplianceEvaluator;
pub use items::ItemCompletenessEvaluator;
pub use line_items::{MinimumLineItemsEvaluator, DEFAULT_MINIMUM_LINE_ITEMS};
pub use regions::EmptyRegionEvaluator;
pub use suppliers::SupplierCountEvaluator;
pub use value_errors::ValueErrorEvaluator;
