//! bidlevel CLI - Command-line interface library
//!
//! This library provides the CLI functionality for bidlevel, including:
//! - Extract: Convert a bid comparison sheet to a JSON record
//! - Evaluate: Score sheets or saved records with a template's rubric
//! - Dataset: Batch-score a dataset of example workbooks
//!
//! # Library Usage
//!
//! ```ignore
//! use bidlevel_cli::{config::Settings, evaluate_inputs};
//!
//! let registries = Settings::default().registries()?;
//! let results = evaluate_inputs(&["record.json".into()], &registries, &inputs, None)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Extract a workbook
//! bidlevel extract bids.xlsx --output record.json
//!
//! # Score it against three source documents
//! bidlevel evaluate record.json -d a.pdf -d b.pdf -d c.pdf --strict
//!
//! # Score a whole dataset
//! bidlevel dataset dataset.json --format json
//! ```

pub mod app;
pub mod config;
pub mod dataset;

// Re-export main entry point and types
pub use app::{
    dataset_command, evaluate_command, evaluate_inputs, expand_inputs, extract_command,
    extract_record, format_result, load_or_extract,
};
pub use app::{run_cli, OutputFormat};
pub use config::{load_settings, Registries, Settings};
pub use dataset::{run_dataset, Dataset, DatasetExample};
