//! Pass/fail verdicts.

use serde::{Deserialize, Serialize};

/// Outcome of one evaluator over one record
///
/// `score` is 1 exactly when `details` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Name of the evaluator that produced this verdict
    pub evaluator: String,
    pub score: u8,
    /// Violations, in the order found
    pub details: Vec<String>,
}

impl Verdict {
    pub fn pass(evaluator: impl Into<String>) -> Self {
        Self {
            evaluator: evaluator.into(),
            score: 1,
            details: Vec::new(),
        }
    }

    pub fn fail(evaluator: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            evaluator: evaluator.into(),
            score: 0,
            details,
        }
    }

    /// Pass when no violations were collected, fail otherwise
    pub fn from_details(evaluator: impl Into<String>, details: Vec<String>) -> Self {
        if details.is_empty() {
            Self::pass(evaluator)
        } else {
            Self::fail(evaluator, details)
        }
    }

    pub fn passed(&self) -> bool {
        self.score == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_details() {
        assert!(Verdict::from_details("x", vec![]).passed());

        let verdict = Verdict::from_details("x", vec!["broken".to_string()]);
        assert_eq!(verdict.score, 0);
        assert_eq!(verdict.details, vec!["broken"]);
    }

    #[test]
    fn test_serializes_score_and_details() {
        let json = serde_json::to_value(Verdict::pass("supplier_count")).unwrap();
        assert_eq!(json["score"], 1);
        assert_eq!(json["details"], serde_json::json!([]));
        assert_eq!(json["evaluator"], "supplier_count");
    }
}
