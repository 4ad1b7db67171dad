//! Empty-region compliance

use bidlevel_extract::{ExtractedRecord, TemplateLayout};

use crate::{Evaluator, RequestInputs, Verdict};

/// Fails when a reserved region holds anything but its tolerated string
///
/// The expected region names come from the layout, so a record that lacks
/// one of them (a partial or hand-edited record) fails for that region.
#[derive(Debug, Clone)]
pub struct EmptyRegionEvaluator {
    expected: Vec<String>,
}

impl EmptyRegionEvaluator {
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
        Self::new(layout.regions.iter().map(|r| r.name.clone()))
    }
}

impl Evaluator for EmptyRegionEvaluator {
    fn code(&self) -> &'static str {
        "BID001"
    }

    fn name(&self) -> &'static str {
        "empty_regions"
    }

    fn evaluate(&self, _inputs: &RequestInputs, record: &ExtractedRecord) -> Verdict {
        let mut details = Vec::new();

        for name in &self.expected {
            let Some(region) = record.region(name) else {
                details.push(format!("Region {} missing from extraction", name));
                continue;
            };

            let offending: Vec<String> = region
                .unexpected()
                .map(|c| format!("{}={:?}", c.cell, c.value.to_string()))
                .collect();
            if !offending.is_empty() {
                details.push(format!(
                    "Region {} ({}) contains unexpected content: {}",
                    region.name,
                    region.range,
                    offending.join(", ")
                ));
            }
        }

        Verdict::from_details(self.name(), details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::fixtures::{empty_region, record};
    use bidlevel_extract::RegionCell;
    use bidlevel_grid::CellValue;

    fn cell(cell: &str, value: &str) -> RegionCell {
        RegionCell {
            cell: cell.to_string(),
            value: CellValue::from(value),
        }
    }

    fn evaluator() -> EmptyRegionEvaluator {
        EmptyRegionEvaluator::new(["first_row", "columns_after_U"])
    }

    #[test]
    fn test_tolerated_banner_passes() {
        let mut record = record();
        let mut first_row = empty_region("first_row", "A1:U1", Some("BID COMPARISON TEMPLATE"));
        first_row.cells = vec![cell("A1", ""), cell("B1", "BID COMPARISON TEMPLATE")];
        record.empty_regions = vec![first_row, empty_region("columns_after_U", "V1:Z100", None)];

        let verdict = evaluator().evaluate(&RequestInputs::default(), &record);
        assert!(verdict.passed(), "{:?}", verdict.details);
    }

    #[test]
    fn test_unexpected_content_fails_region() {
        let mut record = record();
        let mut columns = empty_region("columns_after_U", "V1:Z100", None);
        columns.cells = vec![cell("V3", "note"), cell("W9", "BID COMPARISON TEMPLATE")];
        record.empty_regions = vec![empty_region("first_row", "A1:U1", None), columns];

        let verdict = evaluator().evaluate(&RequestInputs::default(), &record);
        assert_eq!(verdict.score, 0);
        assert_eq!(verdict.details.len(), 1);
        assert!(verdict.details[0].contains("columns_after_U"));
        assert!(verdict.details[0].contains("V3"));
        assert!(verdict.details[0].contains("W9"));
    }

    #[test]
    fn test_missing_region_fails() {
        let mut record = record();
        record.empty_regions = vec![empty_region("first_row", "A1:U1", None)];

        let verdict = evaluator().evaluate(&RequestInputs::default(), &record);
        assert_eq!(verdict.score, 0);
        assert_eq!(
            verdict.details,
            vec!["Region columns_after_U missing from extraction"]
        );
    }
}
