//! Supplier count

use bidlevel_extract::ExtractedRecord;

use crate::{Evaluator, RequestInputs, Verdict};

/// Expects one supplier totals block per source document in the request
#[derive(Debug, Clone, Copy, Default)]
pub struct SupplierCountEvaluator;

impl Evaluator for SupplierCountEvaluator {
    fn code(&self) -> &'static str {
        "BID004"
    }

    fn name(&self) -> &'static str {
        "supplier_count"
    }

    fn evaluate(&self, inputs: &RequestInputs, record: &ExtractedRecord) -> Verdict {
        let expected = inputs.document_count();
        let found = record.totals.len();

        if expected == found {
            Verdict::pass(self.name())
        } else {
            Verdict::fail(
                self.name(),
                vec![format!(
                    "Expected {} suppliers (one per source document) but found {}",
                    expected, found
                )],
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::fixtures::{record, totals};

    fn inputs() -> RequestInputs {
        RequestInputs::new().with_documents(["a.pdf", "b.pdf", "c.pdf"])
    }

    #[test]
    fn test_matching_count_passes() {
        let mut record = record();
        record.totals = totals(&["Acme", "BidCo", "Cable Co"]);
        assert!(SupplierCountEvaluator.evaluate(&inputs(), &record).passed());
    }

    #[test]
    fn test_mismatch_states_both_counts() {
        let mut record = record();
        record.totals = totals(&["Acme", "BidCo"]);

        let verdict = SupplierCountEvaluator.evaluate(&inputs(), &record);
        assert_eq!(verdict.score, 0);
        assert_eq!(verdict.details.len(), 1);
        let detail = verdict.details[0].to_lowercase();
        assert!(detail.contains("expected 3"));
        assert!(detail.contains("found 2"));
    }

    #[test]
    fn test_no_documents_no_totals() {
        assert!(SupplierCountEvaluator
            .evaluate(&RequestInputs::default(), &record())
            .passed());
    }
}
