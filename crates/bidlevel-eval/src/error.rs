//! Error types for suite lookup.

use thiserror::Error;

/// Result type for evaluation operations
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors raised by the evaluation harness
///
/// Evaluators themselves never fail; a broken record scores 0 instead.
#[derive(Debug, Error)]
pub enum EvalError {
    /// No suite is registered for the template id
    #[error("No evaluator suite for template '{template}' (available: {available})")]
    UnknownTemplate { template: String, available: String },

    /// A disabled evaluator name matches nothing in any suite
    #[error("Unknown evaluator: {0}")]
    UnknownEvaluator(String),
}
