//! Formula compliance

use bidlevel_extract::{ExtractedRecord, TemplateLayout};

use crate::{Evaluator, RequestInputs, Verdict};

/// Fails for every expected formula cell that no longer starts with `=`
#[derive(Debug, Clone)]
pub struct FormulaComplianceEvaluator {
    expected: Vec<String>,
}

impl FormulaComplianceEvaluator {
    pub fn new<I, S>(expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expected: expected.into_iter().map(Into::into).collect(),
        }
    }

    pub fn for_layout(layout: &TemplateLayout) -> Self {
        Self::new(layout.formulas.groups.iter().map(|g| g.name.clone()))
    }
}

impl Evaluator for FormulaComplianceEvaluator {
    fn code(&self) -> &'static str {
        "BID002"
    }

    fn name(&self) -> &'static str {
        "formula_compliance"
    }

    fn evaluate(&self, _inputs: &RequestInputs, record: &ExtractedRecord) -> Verdict {
        let mut details = Vec::new();

        for name in &self.expected {
            match record.formula_check(name) {
                Some(group) => details.extend(
                    group
                        .cells
                        .iter()
                        .filter(|c| !c.content.is_formula())
                        .map(|c| format!("Missing or invalid formula in cell {}", c.cell)),
                ),
                None => details.push(format!("Formula group {} missing from extraction", name)),
            }
        }

        Verdict::from_details(self.name(), details)
    }
}
