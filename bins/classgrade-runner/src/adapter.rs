/// Raw Payload Adapter
///
/// **Responsibility:**
/// Turn the test runner's JSON payload into the single `RawRunResult` model.
///
/// The runner emits two payload shapes depending on the integration point:
/// the CLI `--json` output nests per-test entries under
/// `testResults[].assertionResults[]`, while the in-process reporter hook
/// nests them under `testResults[].testResults[]`. Both carry the same
/// `title`/`status`/`duration` triple per test. The ambiguity is resolved
/// here, at the boundary, so the aggregator only ever sees one shape.
use anyhow::{Context, Result};
use classgrade_common::types::{RawResultSet, RawRunResult, RawTestOutcome, TestStatus};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct JestRun {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "numTotalTests")]
    num_total_tests: u32,
    #[serde(default, rename = "numPassedTests")]
    num_passed_tests: u32,
    #[serde(default, rename = "numFailedTests")]
    num_failed_tests: u32,
    // Deliberately not defaulted: a payload without per-result-set detail
    // is malformed and must fall through to the degenerate report.
    #[serde(rename = "testResults")]
    test_results: Vec<JestSuite>,
}

#[derive(Debug, Deserialize)]
struct JestSuite {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "testFilePath")]
    test_file_path: Option<String>,
    #[serde(default, rename = "assertionResults")]
    assertion_results: Vec<JestCase>,
    #[serde(default, rename = "testResults")]
    test_results: Vec<JestCase>,
}

#[derive(Debug, Deserialize)]
struct JestCase {
    #[serde(default)]
    title: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    duration: Option<f64>,
}

/// Parse a runner payload into the normalized run result.
pub fn parse_payload(raw: &str) -> Result<RawRunResult> {
    let run: JestRun =
        serde_json::from_str(raw.trim()).context("Failed to parse test runner payload")?;
    Ok(normalize(run))
}

fn normalize(run: JestRun) -> RawRunResult {
    let result_sets = run
        .test_results
        .into_iter()
        .map(|suite| {
            let identifier = suite
                .name
                .or(suite.test_file_path)
                .unwrap_or_default();

            // Shape A (CLI --json) wins when present; shape B (reporter
            // hook) is the fallback.
            let cases = if suite.assertion_results.is_empty() {
                suite.test_results
            } else {
                suite.assertion_results
            };

            RawResultSet {
                identifier,
                outcomes: cases.into_iter().map(normalize_case).collect(),
            }
        })
        .collect();

    RawRunResult {
        success: run.success,
        total_tests: run.num_total_tests,
        passed_tests: run.num_passed_tests,
        failed_tests: run.num_failed_tests,
        result_sets,
    }
}

fn normalize_case(case: JestCase) -> RawTestOutcome {
    let status = match case.status.as_str() {
        "passed" => TestStatus::Passed,
        "failed" => TestStatus::Failed,
        _ => TestStatus::Other,
    };

    RawTestOutcome {
        title: case.title,
        status,
        duration_ms: case.duration.unwrap_or(0.0).round() as u64,
    }
}
