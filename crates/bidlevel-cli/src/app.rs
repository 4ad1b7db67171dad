//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bidlevel_eval::{ExampleResult, RequestInputs, SuiteReport, Verdict};
use bidlevel_extract::{extract_from_source, ExtractError, ExtractedRecord, TEMPLATE_1};
use bidlevel_grid::{open_source, RangeSpec};
use clap::{Parser, Subcommand, ValueEnum};
use glob::glob;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{load_settings, Registries};
use crate::dataset::{run_dataset, Dataset};

/// Output format for verdicts and reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for harness consumption
    Json,
}

#[derive(Parser)]
#[command(name = "bidlevel")]
#[command(author, version, about = "Extract and score bid comparison spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (defaults to ./bidlevel.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a bid comparison sheet to JSON
    Extract {
        /// Workbook (.xlsx/.xlsm), JSON snapshot or CSV file
        source: PathBuf,

        /// Range to read instead of the template's (e.g. "'Bid Comparison'!A1:Z100")
        #[arg(long)]
        sheet_range: Option<String>,

        /// Template layout to extract with
        #[arg(short, long, default_value = TEMPLATE_1)]
        template: String,

        /// Write the record here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score sheets (or saved records) with a template's evaluator suite
    Evaluate {
        /// Sources or saved record JSON files; glob patterns are expanded
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Source document behind the sheet, one per expected supplier
        #[arg(short, long = "document")]
        documents: Vec<String>,

        /// Template suite to run (defaults to the record's template)
        #[arg(short, long)]
        template: Option<String>,

        /// Chat message recorded with the request
        #[arg(short, long)]
        message: Option<String>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Strict mode: exit with error code if any verdict fails
        #[arg(long)]
        strict: bool,
    },

    /// Score every example of a dataset file
    Dataset {
        /// Dataset JSON file
        dataset: PathBuf,

        /// Template suite for every example
        #[arg(short, long)]
        template: Option<String>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Strict mode: exit with error code if any example fails
        #[arg(long)]
        strict: bool,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?;
    let registries = settings.registries()?;

    match cli.command {
        Commands::Extract {
            source,
            sheet_range,
            template,
            output,
        } => {
            extract_command(
                &source,
                &registries,
                &template,
                sheet_range.as_deref(),
                output.as_deref(),
            )?;
        }
        Commands::Evaluate {
            inputs,
            documents,
            template,
            message,
            format,
            strict,
        } => {
            let request = RequestInputs::new()
                .with_message(message.unwrap_or_default())
                .with_documents(documents);
            evaluate_command(
                &inputs,
                &registries,
                &request,
                template.as_deref(),
                format,
                strict,
            )?;
        }
        Commands::Dataset {
            dataset,
            template,
            format,
            strict,
        } => {
            dataset_command(&dataset, &registries, template.as_deref(), format, strict)?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays machine-readable
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Open a source and extract it with the named layout
pub fn extract_record(
    source: &Path,
    registries: &Registries,
    template: &str,
    sheet_range: Option<&str>,
) -> Result<ExtractedRecord> {
    if !source.exists() {
        anyhow::bail!("Input file not found: {}", source.display());
    }

    let layout = registries
        .layouts
        .get(template)
        .ok_or_else(|| ExtractError::UnknownTemplate(template.to_string()))?;
    let range = sheet_range
        .map(RangeSpec::parse)
        .transpose()
        .context("Invalid --sheet-range")?;

    let grid_source = open_source(source)
        .with_context(|| format!("Failed to open source: {}", source.display()))?;
    extract_from_source(grid_source.as_ref(), layout, range.as_ref())
        .with_context(|| format!("Failed to read sheet: {}", source.display()))
}

/// Execute the extract command
pub fn extract_command(
    source: &Path,
    registries: &Registries,
    template: &str,
    sheet_range: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let record = extract_record(source, registries, template, sheet_range)?;
    info!(
        suppliers = record.metadata.total_suppliers,
        items = record.items.len(),
        "Extracted {}",
        source.display()
    );

    let json =
        serde_json::to_string_pretty(&record).context("Failed to serialize record to JSON")?;
    match output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(())
}

/// Expand glob patterns; a pattern matching nothing is kept as a literal path
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let before = paths.len();
        for entry in glob(pattern).with_context(|| format!("Invalid pattern: {}", pattern))? {
            paths.push(entry.with_context(|| format!("Failed to read match of {}", pattern))?);
        }
        if paths.len() == before {
            paths.push(PathBuf::from(pattern));
        }
    }
    Ok(paths)
}

/// Load a saved record, or extract one from a sheet source
///
/// A `.json` file is a saved record unless it carries a `values` layer,
/// which makes it a sheet snapshot.
pub fn load_or_extract(
    path: &Path,
    registries: &Registries,
    template: Option<&str>,
) -> Result<ExtractedRecord> {
    let is_json = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json && path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        if value.get("values").is_none() {
            debug!(path = %path.display(), "Loading saved record");
            return serde_json::from_value(value)
                .with_context(|| format!("Invalid record in {}", path.display()));
        }
    }

    extract_record(path, registries, template.unwrap_or(TEMPLATE_1), None)
}

/// Score each input with its template's suite
pub fn evaluate_inputs(
    inputs: &[String],
    registries: &Registries,
    request: &RequestInputs,
    template: Option<&str>,
) -> Result<Vec<ExampleResult>> {
    let mut results = Vec::new();

    for path in expand_inputs(inputs)? {
        let record = load_or_extract(&path, registries, template)?;
        let template_id = template
            .map(str::to_string)
            .or_else(|| (!record.template_id.is_empty()).then(|| record.template_id.clone()))
            .unwrap_or_else(|| TEMPLATE_1.to_string());

        let mut request = request.clone();
        request.template_id = Some(template_id.clone());
        let verdicts = bidlevel_eval::evaluate(&registries.suites, &template_id, &request, &record)?;
        results.push(ExampleResult::new(path.display().to_string(), verdicts));
    }

    Ok(results)
}

/// Execute the evaluate command
pub fn evaluate_command(
    inputs: &[String],
    registries: &Registries,
    request: &RequestInputs,
    template: Option<&str>,
    format: OutputFormat,
    strict: bool,
) -> Result<()> {
    let results = evaluate_inputs(inputs, registries, request, template)?;
    let all_passed = results.iter().all(ExampleResult::passed);

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&results)
                .context("Failed to serialize verdicts to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for result in &results {
                print!("{}", format_result(result));
            }
            if results.len() > 1 {
                println!();
                print!("{}", SuiteReport::new(results).format_summary());
            }
        }
    }

    // Exit with error code in strict mode if anything failed
    if strict && !all_passed {
        std::process::exit(1);
    }

    Ok(())
}

/// Execute the dataset command
pub fn dataset_command(
    path: &Path,
    registries: &Registries,
    template: Option<&str>,
    format: OutputFormat,
    strict: bool,
) -> Result<()> {
    let dataset = Dataset::load(path)?;
    let report = run_dataset(&dataset, registries, template)?;

    match format {
        OutputFormat::Json => {
            let json = report.to_json().context("Failed to serialize report to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if !dataset.name.is_empty() {
                println!("=== Dataset: {} ===", dataset.name);
                println!();
            }
            for result in &report.results {
                print!("{}", format_result(result));
            }
            println!();
            print!("{}", report.format_summary());
        }
    }

    if strict && !report.all_passed() {
        std::process::exit(1);
    }

    Ok(())
}

/// Text block for one scored input
pub fn format_result(result: &ExampleResult) -> String {
    let mut output = format!("{}\n", result.name);
    for verdict in &result.verdicts {
        output.push_str(&format_verdict(verdict));
    }
    output
}

fn format_verdict(verdict: &Verdict) -> String {
    let mark = if verdict.passed() { "PASS" } else { "FAIL" };
    let mut output = format!("  [{}] {}\n", mark, verdict.evaluator);
    for detail in &verdict.details {
        output.push_str(&format!("         {}\n", detail));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_extract() {
        let args = vec!["bidlevel", "extract", "bids.xlsx", "--output", "record.json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Extract {
                source,
                sheet_range,
                template,
                output,
            } => {
                assert_eq!(source, PathBuf::from("bids.xlsx"));
                assert_eq!(sheet_range, None);
                assert_eq!(template, "template-1");
                assert_eq!(output, Some(PathBuf::from("record.json")));
            }
            _ => panic!("Expected Extract command"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_extract_range() {
        let args = vec![
            "bidlevel",
            "extract",
            "bids.json",
            "--sheet-range",
            "Bid Comparison!A1:U40",
            "--template",
            "template-2",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Extract {
                sheet_range,
                template,
                ..
            } => {
                assert_eq!(sheet_range.as_deref(), Some("Bid Comparison!A1:U40"));
                assert_eq!(template, "template-2");
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_cli_parse_evaluate() {
        let args = vec![
            "bidlevel",
            "evaluate",
            "out/*.json",
            "-d",
            "a.pdf",
            "--document",
            "b.pdf",
            "--format",
            "json",
            "--strict",
            "--verbose",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Evaluate {
                inputs,
                documents,
                template,
                format,
                strict,
                ..
            } => {
                assert_eq!(inputs, vec!["out/*.json"]);
                assert_eq!(documents, vec!["a.pdf", "b.pdf"]);
                assert_eq!(template, None);
                assert_eq!(format, OutputFormat::Json);
                assert!(strict);
            }
            _ => panic!("Expected Evaluate command"),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_evaluate_requires_input() {
        assert!(Cli::try_parse_from(vec!["bidlevel", "evaluate"]).is_err());
    }

    #[test]
    fn test_cli_parse_dataset_with_global_config() {
        let args = vec!["bidlevel", "--config", "ci.toml", "dataset", "dataset.json"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
        match cli.command {
            Commands::Dataset {
                dataset,
                format,
                strict,
                ..
            } => {
                assert_eq!(dataset, PathBuf::from("dataset.json"));
                assert_eq!(format, OutputFormat::Text);
                assert!(!strict);
            }
            _ => panic!("Expected Dataset command"),
        }
    }

    #[test]
    fn test_format_verdict() {
        let text = format_verdict(&Verdict::fail(
            "supplier_count",
            vec!["Expected 3 suppliers (one per source document) but found 2".to_string()],
        ));
        assert!(text.starts_with("  [FAIL] supplier_count\n"));
        assert!(text.contains("but found 2"));
        assert_eq!(format_verdict(&Verdict::pass("value_errors")), "  [PASS] value_errors\n");
    }

    #[test]
    fn test_expand_inputs_keeps_unmatched_literal() {
        let paths = expand_inputs(&["/nonexistent/record.json".to_string()]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("/nonexistent/record.json")]);
    }
}
