//! bidlevel-eval - Rubric scoring for extracted bid comparisons
//!
//! This crate scores an [`ExtractedRecord`] against the rubric of the
//! template it was extracted with.
//!
//! # Architecture
//!
//! Individual checks implement the [`Evaluator`] trait and return a binary
//! [`Verdict`]. A [`Suite`] is the ordered list of evaluators for one
//! template; a [`SuiteRegistry`] maps template ids to suites and is built
//! once at startup. [`SuiteReport`] aggregates verdicts over a batch.
//!
//! # Example
//!
//! ```
//! use bidlevel_eval::{evaluate, RequestInputs, SuiteRegistry};
//! use bidlevel_extract::ExtractedRecord;
//!
//! let registry = SuiteRegistry::with_defaults();
//! let inputs = RequestInputs::new().with_documents(["a.pdf", "b.pdf"]);
//! let verdicts = evaluate(&registry, "template-1", &inputs, &ExtractedRecord::default()).unwrap();
//! assert_eq!(verdicts.len(), 6);
//! ```

pub mod error;
pub mod evaluators;
pub mod inputs;
pub mod report;
pub mod suite;
pub mod verdict;

use bidlevel_extract::ExtractedRecord;

// Re-exports
pub use error::{EvalError, Result};
pub use evaluators::{
    EmptyRegionEvaluator, FormulaComplianceEvaluator, ItemCompletenessEvaluator,
    MinimumLineItemsEvaluator, SupplierCountEvaluator, ValueErrorEvaluator,
    DEFAULT_MINIMUM_LINE_ITEMS,
};
pub use inputs::RequestInputs;
pub use report::{EvaluatorSummary, ExampleResult, SuiteReport};
pub use suite::{Suite, SuiteOptions, SuiteRegistry};
pub use verdict::Verdict;

/// Trait for rubric evaluators
///
/// Evaluators only read their arguments, so any subset of a suite can run
/// in any order without changing another evaluator's verdict.
pub trait Evaluator: Send + Sync {
    /// Short unique code (e.g., "BID004")
    fn code(&self) -> &'static str;

    /// Name reported in verdicts and used to disable the evaluator
    fn name(&self) -> &'static str;

    /// Score one record
    fn evaluate(&self, inputs: &RequestInputs, record: &ExtractedRecord) -> Verdict;
}

/// Run the suite registered for `template_id`, one verdict per evaluator
pub fn evaluate(
    registry: &SuiteRegistry,
    template_id: &str,
    inputs: &RequestInputs,
    record: &ExtractedRecord,
) -> Result<Vec<Verdict>> {
    Ok(registry.suite(template_id)?.run(inputs, record))
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
