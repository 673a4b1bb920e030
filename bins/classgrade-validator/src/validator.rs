/// Report Validator - Artifact Integrity Checks
///
/// **Core Responsibility:**
/// Re-read the persisted scoring report and decide whether the grading
/// platform may trust it.
///
/// **Pipeline (short-circuiting):**
/// 1. Existence - artifact file present
/// 2. Parseability - well-formed JSON
/// 3. Structure - required top-level fields present
/// 4. Content - exercise list shape, weights, earned <= possible
/// 5. Scores - sum equality, fixed total, range
/// 6. Plausibility - timestamp and counter heuristics
///
/// The first failing stage stops the pipeline and yields an invalid verdict
/// with zero credited points. Stage 6 is heuristic only: a future timestamp
/// is fatal, everything else there is a warning. These checks are
/// plausibility checks, not a security boundary.
///
/// Validation failures are data, never `Err`: every problem lands in the
/// verdict's `errors`/`warnings` collections.
use chrono::{DateTime, Duration, Utc};
use classgrade_common::catalog;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

/// Fields that must exist at the top level of the artifact.
const REQUIRED_TOP_LEVEL: [&str; 3] = ["exercises", "summary", "executedAt"];

/// Fields that must exist on every exercise entry.
const REQUIRED_PER_EXERCISE: [&str; 9] = [
    "exerciseId",
    "name",
    "state",
    "testsTotal",
    "testsPassed",
    "testsFailed",
    "pointsPossible",
    "pointsEarned",
    "percent",
];

/// Outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub points: u64,
    pub percent: u64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Verdict {
    /// Display-only pass/fail judgment against the fixed threshold. The
    /// numeric score is the real output; nothing downstream enforces this.
    pub fn passed(&self) -> bool {
        self.valid && self.points >= u64::from(catalog::PASS_THRESHOLD)
    }
}

/// Runs the validation pipeline, collecting errors and warnings.
#[derive(Debug, Default)]
pub struct ReportValidator {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ReportValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the artifact at `path` and produce the verdict.
    pub fn validate(mut self, path: &Path) -> Verdict {
        let Some(content) = self.check_exists(path) else {
            return self.reject();
        };
        let Some(report) = self.check_parses(&content) else {
            return self.reject();
        };
        if !self.check_structure(&report) {
            return self.reject();
        }
        if !self.check_content(&report) {
            return self.reject();
        }
        if !self.check_scores(&report) {
            return self.reject();
        }
        if !self.check_plausibility(&report) {
            return self.reject();
        }
        self.accept(&report)
    }

    /// Stage 1: the artifact file must exist and be readable.
    fn check_exists(&mut self, path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(content) => {
                info!(path = %path.display(), "Report artifact found");
                Some(content)
            }
            Err(e) => {
                self.errors
                    .push(format!("Report file not found: {} ({})", path.display(), e));
                None
            }
        }
    }

    /// Stage 2: the content must be well-formed JSON.
    fn check_parses(&mut self, content: &str) -> Option<Value> {
        match serde_json::from_str::<Value>(content) {
            Ok(report) => {
                info!("Report artifact is valid JSON");
                Some(report)
            }
            Err(e) => {
                self.errors
                    .push(format!("Report file is not valid JSON: {e}"));
                None
            }
        }
    }

    /// Stage 3: required top-level fields must all be present.
    fn check_structure(&mut self, report: &Value) -> bool {
        let missing: Vec<&str> = REQUIRED_TOP_LEVEL
            .iter()
            .filter(|field| report.get(**field).is_none())
            .copied()
            .collect();

        if !missing.is_empty() {
            self.errors.push(format!(
                "Report structure incomplete; missing fields: {}",
                missing.join(", ")
            ));
            return false;
        }

        info!("Report structure is complete");
        true
    }

    /// Stage 4: the exercise list must match the catalog shape.
    fn check_content(&mut self, report: &Value) -> bool {
        let Some(exercises) = report["exercises"].as_array() else {
            self.errors
                .push("The 'exercises' field must be an array".to_string());
            return false;
        };

        if exercises.len() != catalog::EXERCISES.len() {
            self.errors.push(format!(
                "Expected {} exercises, found {}",
                catalog::EXERCISES.len(),
                exercises.len()
            ));
            return false;
        }

        for exercise in exercises {
            if !self.check_exercise(exercise) {
                return false;
            }
        }

        info!("Exercise content is valid");
        true
    }

    fn check_exercise(&mut self, exercise: &Value) -> bool {
        let id_label = exercise["exerciseId"]
            .as_u64()
            .map_or_else(|| "?".to_string(), |id| id.to_string());

        let missing: Vec<&str> = REQUIRED_PER_EXERCISE
            .iter()
            .filter(|field| exercise.get(**field).is_none())
            .copied()
            .collect();
        if !missing.is_empty() {
            self.errors.push(format!(
                "Exercise {} is missing fields: {}",
                id_label,
                missing.join(", ")
            ));
            return false;
        }

        let id = exercise["exerciseId"].as_u64().unwrap_or(0);
        let Some(expected) = u32::try_from(id).ok().and_then(catalog::points_for) else {
            self.errors
                .push(format!("Exercise {id_label} has an unknown exercise id"));
            return false;
        };

        let Some(possible) = exercise["pointsPossible"].as_u64() else {
            self.errors.push(format!(
                "Exercise {id_label}: pointsPossible must be a non-negative integer"
            ));
            return false;
        };
        if possible != u64::from(expected) {
            self.errors.push(format!(
                "Exercise {id_label}: wrong pointsPossible (expected {expected}, found {possible})"
            ));
            return false;
        }

        let Some(earned) = exercise["pointsEarned"].as_u64() else {
            self.errors.push(format!(
                "Exercise {id_label}: pointsEarned must be a non-negative integer"
            ));
            return false;
        };
        if earned > possible {
            self.errors.push(format!(
                "Exercise {id_label}: pointsEarned ({earned}) exceeds pointsPossible ({possible})"
            ));
            return false;
        }

        true
    }

    /// Stage 5: summary score consistency.
    fn check_scores(&mut self, report: &Value) -> bool {
        let summary = &report["summary"];

        let (Some(earned), Some(total)) = (
            summary["pointsEarned"].as_i64(),
            summary["pointsTotal"].as_i64(),
        ) else {
            self.errors
                .push("Summary points are missing or not integers".to_string());
            return false;
        };

        // Stage 4 already rejected non-integer per-exercise points, so the
        // defaults here can never mask a malformed entry.
        let exercise_sum: i64 = report["exercises"]
            .as_array()
            .map(|exercises| {
                exercises
                    .iter()
                    .map(|e| e["pointsEarned"].as_i64().unwrap_or(0))
                    .sum()
            })
            .unwrap_or(0);

        if exercise_sum != earned {
            self.errors.push(format!(
                "Points sum mismatch (exercises sum to {exercise_sum}, summary reports {earned})"
            ));
            return false;
        }

        if total != i64::from(catalog::TOTAL_POINTS) {
            self.errors.push(format!(
                "Wrong points total (expected {}, found {total})",
                catalog::TOTAL_POINTS
            ));
            return false;
        }

        if earned < 0 || earned > total {
            self.errors.push(format!(
                "Points out of range (0-{total}): {earned}"
            ));
            return false;
        }

        info!("Score consistency verified");
        true
    }

    /// Stage 6: authenticity heuristics. Only a future timestamp is fatal.
    fn check_plausibility(&mut self, report: &Value) -> bool {
        let executed_at = report["executedAt"]
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|ts| ts.with_timezone(&Utc));

        match executed_at {
            None => {
                self.warnings
                    .push("executedAt is not a valid timestamp".to_string());
            }
            Some(ts) => {
                let age = Utc::now().signed_duration_since(ts);
                if age < Duration::zero() {
                    self.errors.push(
                        "executedAt is in the future - possible tampering".to_string(),
                    );
                    return false;
                }
                if age > Duration::days(30) {
                    self.warnings.push(format!(
                        "Report is more than 30 days old ({} days)",
                        age.num_days()
                    ));
                }
            }
        }

        let per_exercise_tests: i64 = report["exercises"]
            .as_array()
            .map(|exercises| {
                exercises
                    .iter()
                    .map(|e| e["testsTotal"].as_i64().unwrap_or(0))
                    .sum()
            })
            .unwrap_or(0);

        if report["summary"]["totalTests"].as_i64() != Some(per_exercise_tests) {
            self.warnings.push(
                "Summary totalTests does not match the per-exercise sum".to_string(),
            );
        }

        info!("Plausibility checks completed");
        true
    }

    fn accept(self, report: &Value) -> Verdict {
        let points = report["summary"]["pointsEarned"].as_u64().unwrap_or(0);
        let percent = report["summary"]["percentFinal"]
            .as_u64()
            .unwrap_or(100 * points / u64::from(catalog::TOTAL_POINTS));

        Verdict {
            valid: true,
            points,
            percent,
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    fn reject(self) -> Verdict {
        Verdict {
            valid: false,
            points: 0,
            percent: 0,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}
