//! Evaluator suites keyed by template id.

use std::collections::BTreeMap;

use bidlevel_extract::{ExtractedRecord, LayoutRegistry, TemplateLayout, TEMPLATE_1};
use tracing::debug;

use crate::error::{EvalError, Result};
use crate::evaluators::{
    EmptyRegionEvaluator, FormulaComplianceEvaluator, ItemCompletenessEvaluator,
    MinimumLineItemsEvaluator, SupplierCountEvaluator, ValueErrorEvaluator,
    DEFAULT_MINIMUM_LINE_ITEMS,
};
use crate::{Evaluator, RequestInputs, Verdict};

/// Knobs applied when building the standard suite for a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteOptions {
    pub minimum_line_items: usize,
    /// Evaluator names left out of every suite
    pub disabled: Vec<String>,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            minimum_line_items: DEFAULT_MINIMUM_LINE_ITEMS,
            disabled: Vec::new(),
        }
    }
}

/// An ordered list of evaluators for one template
pub struct Suite {
    template_id: String,
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl Suite {
    /// Create an empty suite
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            evaluators: Vec::new(),
        }
    }

    /// All six evaluators, configured from the layout's regions and formula groups
    pub fn standard(layout: &TemplateLayout, minimum_line_items: usize) -> Self {
        let mut suite = Self::new(layout.template_id.clone());
        suite.add(Box::new(EmptyRegionEvaluator::for_layout(layout)));
        suite.add(Box::new(FormulaComplianceEvaluator::for_layout(layout)));
        suite.add(Box::new(ItemCompletenessEvaluator));
        suite.add(Box::new(SupplierCountEvaluator));
        suite.add(Box::new(MinimumLineItemsEvaluator::new(minimum_line_items)));
        suite.add(Box::new(ValueErrorEvaluator));
        suite
    }

    pub fn add(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluators.push(evaluator);
    }

    /// Drop the named evaluators
    pub fn without<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.evaluators
            .retain(|e| !names.iter().any(|n| n.as_ref() == e.name()));
        self
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.evaluators.iter().map(|e| e.name()).collect()
    }

    /// Run every evaluator, returning verdicts in suite order
    pub fn run(&self, inputs: &RequestInputs, record: &ExtractedRecord) -> Vec<Verdict> {
        self.evaluators
            .iter()
            .map(|evaluator| {
                let verdict = evaluator.evaluate(inputs, record);
                debug!(
                    evaluator = evaluator.name(),
                    code = evaluator.code(),
                    score = verdict.score,
                    "Evaluated"
                );
                verdict
            })
            .collect()
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("template_id", &self.template_id)
            .field("evaluators", &self.names())
            .finish()
    }
}

/// Suites keyed by template id, built once and then only read
#[derive(Debug, Default)]
pub struct SuiteRegistry {
    suites: BTreeMap<String, Suite>,
}

impl SuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `template-1` suite with default options
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Suite::standard(
            &TemplateLayout::template_1(),
            DEFAULT_MINIMUM_LINE_ITEMS,
        ));
        registry
    }

    /// One standard suite per registered layout
    ///
    /// Fails when a disabled name matches none of the standard evaluators.
    pub fn from_layouts(layouts: &LayoutRegistry, options: &SuiteOptions) -> Result<Self> {
        let known = Suite::standard(&TemplateLayout::template_1(), 0).names();
        if let Some(unknown) = options
            .disabled
            .iter()
            .find(|name| !known.contains(&name.as_str()))
        {
            return Err(EvalError::UnknownEvaluator(unknown.clone()));
        }

        let mut registry = Self::new();
        for id in layouts.template_ids() {
            if let Some(layout) = layouts.get(id) {
                let suite = Suite::standard(layout, options.minimum_line_items)
                    .without(options.disabled.as_slice());
                registry.register(suite);
            }
        }
        Ok(registry)
    }

    /// Add a suite, replacing any suite for the same template
    pub fn register(&mut self, suite: Suite) {
        self.suites.insert(suite.template_id.clone(), suite);
    }

    pub fn get(&self, template_id: &str) -> Option<&Suite> {
        self.suites.get(template_id)
    }

    pub fn template_ids(&self) -> Vec<&str> {
        self.suites.keys().map(String::as_str).collect()
    }

    /// Look up a suite, failing with the list of known templates
    pub fn suite(&self, template_id: &str) -> Result<&Suite> {
        self.get(template_id)
            .ok_or_else(|| EvalError::UnknownTemplate {
                template: template_id.to_string(),
                available: self.template_ids().join(", "),
            })
    }

    /// Template used when a request names none
    pub fn default_template(&self) -> &str {
        TEMPLATE_1
    }
}
