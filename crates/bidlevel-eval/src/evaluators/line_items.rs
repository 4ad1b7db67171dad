//! Minimum line items

use bidlevel_extract::ExtractedRecord;

use crate::{Evaluator, RequestInputs, Verdict};

/// Threshold used by the built-in suites
pub const DEFAULT_MINIMUM_LINE_ITEMS: usize = 3;

/// Fails when fewer than `threshold` items were retained
#[derive(Debug, Clone, Copy)]
pub struct MinimumLineItemsEvaluator {
    threshold: usize,
}

impl MinimumLineItemsEvaluator {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Default for MinimumLineItemsEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_MINIMUM_LINE_ITEMS)
    }
}

impl Evaluator for MinimumLineItemsEvaluator {
    fn code(&self) -> &'static str {
        "BID005"
    }

    fn name(&self) -> &'static str {
        "minimum_line_items"
    }

    fn evaluate(&self, _inputs: &RequestInputs, record: &ExtractedRecord) -> Verdict {
        let found = record.items.len();
        if found >= self.threshold {
            Verdict::pass(self.name())
        } else {
            Verdict::fail(
                self.name(),
                vec![format!(
                    "Expected at least {} line items but found {}",
                    self.threshold, found
                )],
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::fixtures::{bid, item, record};

    fn record_with(count: usize) -> ExtractedRecord {
        let mut record = record();
        record.items = (0..count)
            .map(|i| item(4 + i, Some("Part"), vec![bid("Acme", "1", "1")]))
            .collect();
        record
    }

    #[test]
    fn test_two_items_fail() {
        let verdict = MinimumLineItemsEvaluator::default()
            .evaluate(&RequestInputs::default(), &record_with(2));
        assert_eq!(verdict.score, 0);
        assert_eq!(
            verdict.details,
            vec!["Expected at least 3 line items but found 2"]
        );
    }

    #[test]
    fn test_three_items_pass() {
        let verdict = MinimumLineItemsEvaluator::default()
            .evaluate(&RequestInputs::default(), &record_with(3));
        assert!(verdict.passed());
    }

    #[test]
    fn test_custom_threshold() {
        let evaluator = MinimumLineItemsEvaluator::new(1);
        assert_eq!(evaluator.threshold(), 1);
        assert!(evaluator
            .evaluate(&RequestInputs::default(), &record_with(1))
            .passed());
    }
}
