use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a single test case as reported by the test runner.
///
/// Anything that is neither `passed` nor `failed` (pending, skipped, todo)
/// collapses into `Other` and never earns points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    #[serde(other)]
    Other,
}

/// One atomic test case outcome, already normalized from the runner payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTestOutcome {
    pub title: String,
    pub status: TestStatus,
    pub duration_ms: u64,
}

/// All outcomes that originated from one result set (one test file).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResultSet {
    /// File path or name string the runner used for this set.
    pub identifier: String,
    pub outcomes: Vec<RawTestOutcome>,
}

/// The full test-run payload after boundary normalization.
///
/// The grand counters (`total_tests` etc.) are the runner's own aggregate
/// numbers and are carried through to the report summary as-is; they are not
/// recomputed from the result sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRunResult {
    pub success: bool,
    pub total_tests: u32,
    pub passed_tests: u32,
    pub failed_tests: u32,
    pub result_sets: Vec<RawResultSet>,
}

/// Grading state of a single exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseState {
    Approved,
    Partial,
    Failed,
    NotRun,
}

impl ExerciseState {
    /// Console icon used by both report renderers.
    pub fn icon(&self) -> &'static str {
        match self {
            ExerciseState::Approved => "✅",
            ExerciseState::Partial => "⚠️",
            ExerciseState::Failed => "❌",
            ExerciseState::NotRun => "⬜",
        }
    }
}

/// Per-test detail line kept inside an exercise report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDetail {
    pub name: String,
    pub status: TestStatus,
    pub duration_ms: u64,
}

/// Scoring result for one exercise of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseReport {
    pub exercise_id: u32,
    pub name: String,
    pub state: ExerciseState,
    pub tests_total: u32,
    pub tests_passed: u32,
    pub tests_failed: u32,
    pub points_possible: u32,
    pub points_earned: u32,
    pub percent: u32,
    #[serde(default)]
    pub details: Vec<TestDetail>,
}

/// Catalog-wide totals of a scoring report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_exercises: u32,
    pub complete_count: u32,
    pub partial_count: u32,
    pub failed_count: u32,
    pub total_tests: u32,
    pub tests_passed: u32,
    pub tests_failed: u32,
    pub points_total: u32,
    pub points_earned: u32,
    pub percent_final: u32,
}

/// The persisted report artifact consumed by the grading platform.
///
/// Created once by the aggregator, serialized to disk, then read-only for
/// every later consumer. `exercises` always has exactly one entry per catalog
/// exercise, in catalog order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringReport {
    pub success: bool,
    pub executed_at: DateTime<Utc>,
    pub exercises: Vec<ExerciseReport>,
    pub summary: Summary,
}
