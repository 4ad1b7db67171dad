//! Batch scoring over a dataset of example workbooks.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bidlevel_eval::{ExampleResult, RequestInputs, SuiteReport};
use bidlevel_extract::TEMPLATE_1;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::extract_record;
use crate::config::Registries;

/// A set of examples scored with one template's suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub name: String,
    /// Template used by examples that do not name one
    #[serde(default = "default_template")]
    pub template_id: String,
    pub examples: Vec<DatasetExample>,
}

/// One workbook and the request that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetExample {
    #[serde(default)]
    pub name: String,
    /// Filled-in workbook (or JSON snapshot), relative to the dataset file
    pub workbook: PathBuf,
    #[serde(default)]
    pub inputs: RequestInputs,
}

fn default_template() -> String {
    TEMPLATE_1.to_string()
}

impl Dataset {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a dataset file, resolving workbook paths against its directory
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Dataset file not found: {}", path.display());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
        let mut dataset = Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse dataset: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for example in &mut dataset.examples {
            if example.workbook.is_relative() {
                example.workbook = base.join(&example.workbook);
            }
        }
        Ok(dataset)
    }

    /// Template for one example: override, then the example's own, then the dataset's
    pub fn template_for<'a>(
        &'a self,
        example: &'a DatasetExample,
        template_override: Option<&'a str>,
    ) -> &'a str {
        template_override
            .or(example.inputs.template_id.as_deref())
            .unwrap_or(self.template_id.as_str())
    }
}

impl DatasetExample {
    /// Name shown in reports (the workbook file stem when unnamed)
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        self.workbook
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.workbook.display().to_string())
    }
}

/// Extract and score every example
pub fn run_dataset(
    dataset: &Dataset,
    registries: &Registries,
    template_override: Option<&str>,
) -> Result<SuiteReport> {
    let mut results = Vec::with_capacity(dataset.examples.len());

    for example in &dataset.examples {
        let template = dataset.template_for(example, template_override);
        let name = example.display_name();
        info!(example = %name, template, "Scoring example");

        let record = extract_record(&example.workbook, registries, template, None)
            .with_context(|| format!("Failed to extract example '{}'", name))?;
        let suite = registries.suites.suite(template)?;

        let mut inputs = example.inputs.clone();
        inputs.template_id = Some(template.to_string());
        results.push(ExampleResult::new(name, suite.run(&inputs, &record)));
    }

    Ok(SuiteReport::new(results))
}
