//! Value-error scan

use bidlevel_extract::ExtractedRecord;
use bidlevel_grid::{cell_ref, VALUE_ERROR_TOKEN};

use crate::{Evaluator, RequestInputs, Verdict};

/// Fails for every cell of the sheet snapshot showing `#VALUE!`
///
/// An empty snapshot passes; a record saved without one fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueErrorEvaluator;

impl Evaluator for ValueErrorEvaluator {
    fn code(&self) -> &'static str {
        "BID006"
    }

    fn name(&self) -> &'static str {
        "value_errors"
    }

    fn evaluate(&self, _inputs: &RequestInputs, record: &ExtractedRecord) -> Verdict {
        let Some(sheet) = &record.sheet else {
            return Verdict::fail(
                self.name(),
                vec!["Sheet snapshot missing from extraction".to_string()],
            );
        };

        let details = sheet
            .cells()
            .filter(|(_, _, value)| value.as_text().is_some_and(|t| t.contains(VALUE_ERROR_TOKEN)))
            .map(|(row, col, _)| format!("{} error in cell {}", VALUE_ERROR_TOKEN, cell_ref(row, col)))
            .collect();

        Verdict::from_details(self.name(), details)
    }
}
