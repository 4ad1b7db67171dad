//! Aggregation of verdicts across a batch of examples.

use serde::{Deserialize, Serialize};

use crate::Verdict;

/// Verdicts for one scored example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleResult {
    pub name: String,
    pub verdicts: Vec<Verdict>,
}

impl ExampleResult {
    pub fn new(name: impl Into<String>, verdicts: Vec<Verdict>) -> Self {
        Self {
            name: name.into(),
            verdicts,
        }
    }

    /// True when every verdict passed
    pub fn passed(&self) -> bool {
        self.verdicts.iter().all(Verdict::passed)
    }

    /// Mean of the verdict scores (0.0 when there are none)
    pub fn score(&self) -> f64 {
        mean(self.verdicts.iter().map(|v| f64::from(v.score)))
    }
}

/// Pass statistics for one evaluator over the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorSummary {
    pub evaluator: String,
    pub runs: usize,
    pub passed: usize,
    /// Fraction of runs that passed (0.0 - 1.0)
    pub pass_rate: f64,
}

/// Batch report: every example's verdicts plus summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub results: Vec<ExampleResult>,
    /// Per evaluator, in first-seen order
    pub evaluators: Vec<EvaluatorSummary>,
    /// Mean of all verdict scores
    pub mean_score: f64,
    /// Examples where every verdict passed
    pub passed: usize,
    pub failed: usize,
}

impl SuiteReport {
    pub fn new(results: Vec<ExampleResult>) -> Self {
        let mut evaluators: Vec<EvaluatorSummary> = Vec::new();
        for verdict in results.iter().flat_map(|r| &r.verdicts) {
            let existing = evaluators
                .iter()
                .position(|s| s.evaluator == verdict.evaluator);
            let summary = match existing {
                Some(idx) => &mut evaluators[idx],
                None => {
                    evaluators.push(EvaluatorSummary {
                        evaluator: verdict.evaluator.clone(),
                        runs: 0,
                        passed: 0,
                        pass_rate: 0.0,
                    });
                    let last = evaluators.len() - 1;
                    &mut evaluators[last]
                }
            };
            summary.runs += 1;
            if verdict.passed() {
                summary.passed += 1;
            }
        }
        for summary in &mut evaluators {
            summary.pass_rate = summary.passed as f64 / summary.runs as f64;
        }

        let mean_score = mean(
            results
                .iter()
                .flat_map(|r| &r.verdicts)
                .map(|v| f64::from(v.score)),
        );
        let passed = results.iter().filter(|r| r.passed()).count();
        let failed = results.len() - passed;

        Self {
            results,
            evaluators,
            mean_score,
            passed,
            failed,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> Vec<&ExampleResult> {
        self.results.iter().filter(|r| !r.passed()).collect()
    }

    /// Human-readable summary
    pub fn format_summary(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Examples: {}\n", self.results.len()));
        output.push_str(&format!("  Passed: {}\n", self.passed));
        output.push_str(&format!("  Failed: {}\n", self.failed));
        output.push_str(&format!("  Mean score: {:.3}\n", self.mean_score));

        if !self.evaluators.is_empty() {
            output.push_str("\nEvaluators:\n");
            for summary in &self.evaluators {
                output.push_str(&format!(
                    "  {}: {}/{} ({:.1}%)\n",
                    summary.evaluator,
                    summary.passed,
                    summary.runs,
                    summary.pass_rate * 100.0
                ));
            }
        }

        if self.failed > 0 {
            output.push_str("\nFailed examples:\n");
            for result in self.failures() {
                let failing: Vec<&str> = result
                    .verdicts
                    .iter()
                    .filter(|v| !v.passed())
                    .map(|v| v.evaluator.as_str())
                    .collect();
                output.push_str(&format!("  - {} ({})\n", result.name, failing.join(", ")));
            }
        }

        output
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn mean(scores: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = scores.fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
