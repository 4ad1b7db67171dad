//! Configuration settings
//!
//! Read from `bidlevel.toml` (or `.bidlevel.toml`) in the working directory,
//! or from the file passed with `--config`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bidlevel_eval::{SuiteOptions, SuiteRegistry, DEFAULT_MINIMUM_LINE_ITEMS};
use bidlevel_extract::{LayoutRegistry, TemplateLayout};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Scoring settings
    pub evaluation: EvaluationSettings,
    /// Extra template layouts; one with a built-in id replaces it
    pub templates: Vec<TemplateLayout>,
}

/// Scoring settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Fewest retained items the line-item check accepts
    pub minimum_line_items: usize,
    /// Evaluator names dropped from every suite
    pub disabled: Vec<String>,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            minimum_line_items: DEFAULT_MINIMUM_LINE_ITEMS,
            disabled: Vec::new(),
        }
    }
}

/// Layout and suite tables, built once per run
#[derive(Debug)]
pub struct Registries {
    pub layouts: LayoutRegistry,
    pub suites: SuiteRegistry,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    pub fn suite_options(&self) -> SuiteOptions {
        SuiteOptions {
            minimum_line_items: self.evaluation.minimum_line_items,
            disabled: self.evaluation.disabled.clone(),
        }
    }

    /// Build the layout registry (built-ins plus configured templates) and
    /// one standard suite per layout
    pub fn registries(&self) -> Result<Registries> {
        let mut layouts = LayoutRegistry::with_defaults();
        for layout in &self.templates {
            debug!(template = %layout.template_id, "Registering configured layout");
            layouts
                .register(layout.clone())
                .with_context(|| format!("Invalid template '{}'", layout.template_id))?;
        }

        let suites = SuiteRegistry::from_layouts(&layouts, &self.suite_options())
            .context("Invalid [evaluation] settings")?;

        Ok(Registries { layouts, suites })
    }
}

/// Load settings from `config_path`, or from the first config file found in
/// the working directory, or fall back to defaults
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Settings::from_toml_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        }
        None => {
            let candidates = ["bidlevel.toml", ".bidlevel.toml"];
            for candidate in candidates {
                if Path::new(candidate).exists() {
                    let content = fs::read_to_string(candidate)?;
                    match Settings::from_toml_str(&content) {
                        Ok(settings) => return Ok(settings),
                        Err(e) => warn!(file = candidate, error = %e, "Ignoring unreadable config"),
                    }
                }
            }
            Ok(Settings::default())
        }
    }
}
