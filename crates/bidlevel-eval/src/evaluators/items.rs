//! Item completeness

use bidlevel_extract::ExtractedRecord;

use crate::{Evaluator, RequestInputs, Verdict};

/// Fails when an item has no name or a bid lacks a usable price or quantity
///
/// A blank cell is reported as missing; a filled cell that did not parse
/// as a number is reported as an invalid format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemCompletenessEvaluator;

impl Evaluator for ItemCompletenessEvaluator {
    fn code(&self) -> &'static str {
        "BID003"
    }

    fn name(&self) -> &'static str {
        "item_completeness"
    }

    fn evaluate(&self, _inputs: &RequestInputs, record: &ExtractedRecord) -> Verdict {
        let mut details = Vec::new();

        for item in &record.items {
            let row = item.row_index;
            if item.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                details.push(format!("Missing name for item at row {}", row));
            }

            for bid in &item.bids {
                let fields = [
                    ("price", bid.price, &bid.raw_values.price),
                    ("quantity", bid.quantity, &bid.raw_values.quantity),
                ];
                for (field, parsed, raw) in fields {
                    if parsed.is_some() {
                        continue;
                    }
                    let detail = if raw.is_blank() {
                        format!("Missing {} for {} in item at row {}", field, bid.supplier, row)
                    } else {
                        format!(
                            "Invalid {} format for {} in item at row {}",
                            field, bid.supplier, row
                        )
                    };
                    details.push(detail);
                }
            }
        }

        Verdict::from_details(self.name(), details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::fixtures::{bid, item, record};

    #[test]
    fn test_complete_items_pass() {
        let mut record = record();
        record.items = vec![
            item(4, Some("Cable"), vec![bid("Acme", "$10.00", "2")]),
            item(5, Some("Conduit"), vec![bid("Acme", "3", "1"), bid("BidCo", "2,50", "1")]),
        ];
        let verdict = ItemCompletenessEvaluator.evaluate(&RequestInputs::default(), &record);
        assert!(verdict.passed(), "{:?}", verdict.details);
    }

    #[test]
    fn test_violations_name_row_and_supplier() {
        let mut record = record();
        record.items = vec![
            item(4, None, vec![bid("Acme", "", "2")]),
            item(7, Some("Labor"), vec![bid("BidCo", "TBD", "")]),
        ];

        let verdict = ItemCompletenessEvaluator.evaluate(&RequestInputs::default(), &record);
        assert_eq!(verdict.score, 0);
        assert_eq!(
            verdict.details,
            vec![
                "Missing name for item at row 4",
                "Missing price for Acme in item at row 4",
                "Invalid price format for BidCo in item at row 7",
                "Missing quantity for BidCo in item at row 7",
            ]
        );
    }

    #[test]
    fn test_no_items_passes() {
        let verdict = ItemCompletenessEvaluator.evaluate(&RequestInputs::default(), &record());
        assert!(verdict.passed());
    }
}
