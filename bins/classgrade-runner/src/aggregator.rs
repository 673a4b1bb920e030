/// Score Aggregator - Exercise Scoring Logic
///
/// **Core Responsibility:**
/// Map a normalized test-run payload onto the weighted exercise catalog and
/// produce the scoring report artifact.
///
/// **Critical Properties:**
/// - Knows nothing about subprocesses or payload shapes
/// - Knows nothing about file I/O
/// - Pure function: (run result, catalog) → scoring report
///
/// **Scoring Rules:**
/// - pointsEarned = floor(pointsPossible * testsPassed / testsTotal)
/// - percent = floor(100 * testsPassed / testsTotal), 0 when no tests ran
/// - state: approved when nothing failed, partial when something passed,
///   failed when everything failed, not-run when no outcomes exist
///
/// **Source-of-truth split:**
/// Per-exercise counts come from the matched result sets, but the summary's
/// grand test totals come from the run's own aggregate counters. The
/// validator cross-checks the two and warns on mismatch instead of
/// reconciling them here.
use chrono::Utc;
use classgrade_common::catalog::{self, ExerciseSpec};
use classgrade_common::types::{
    ExerciseReport, ExerciseState, RawResultSet, RawRunResult, ScoringReport, Summary,
    TestDetail, TestStatus,
};

/// Build the scoring report for one test run.
pub fn aggregate(raw: &RawRunResult) -> ScoringReport {
    let exercises: Vec<ExerciseReport> = catalog::EXERCISES
        .iter()
        .map(|spec| score_exercise(spec, raw))
        .collect();

    let points_earned: u32 = exercises.iter().map(|e| e.points_earned).sum();

    let summary = Summary {
        total_exercises: catalog::EXERCISES.len() as u32,
        complete_count: count_state(&exercises, ExerciseState::Approved),
        partial_count: count_state(&exercises, ExerciseState::Partial),
        failed_count: count_state(&exercises, ExerciseState::Failed),
        // Grand totals from the run's own counters, not per-exercise sums.
        total_tests: raw.total_tests,
        tests_passed: raw.passed_tests,
        tests_failed: raw.failed_tests,
        points_total: catalog::TOTAL_POINTS,
        points_earned,
        percent_final: 100 * points_earned / catalog::TOTAL_POINTS,
    };

    ScoringReport {
        success: raw.success,
        executed_at: Utc::now(),
        exercises,
        summary,
    }
}

/// Degenerate all-zero report, persisted when the runner payload is absent
/// or malformed so that a report artifact always exists for validation.
pub fn empty_report() -> ScoringReport {
    ScoringReport {
        success: false,
        executed_at: Utc::now(),
        exercises: catalog::EXERCISES.iter().map(not_run).collect(),
        summary: Summary {
            total_exercises: catalog::EXERCISES.len() as u32,
            complete_count: 0,
            partial_count: 0,
            failed_count: 0,
            total_tests: 0,
            tests_passed: 0,
            tests_failed: 0,
            points_total: catalog::TOTAL_POINTS,
            points_earned: 0,
            percent_final: 0,
        },
    }
}

/// Score a single exercise against the run result.
///
/// The exercise's result set is the first one whose identifier contains the
/// spec's selector substring; at most one match is expected.
fn score_exercise(spec: &ExerciseSpec, raw: &RawRunResult) -> ExerciseReport {
    let matched = raw
        .result_sets
        .iter()
        .find(|set| set.identifier.contains(spec.result_selector));

    match matched {
        Some(set) if !set.outcomes.is_empty() => score_matched(spec, set),
        // An empty result set carries no signal either way, same as absent.
        _ => not_run(spec),
    }
}

fn score_matched(spec: &ExerciseSpec, set: &RawResultSet) -> ExerciseReport {
    let tests_total = set.outcomes.len() as u32;
    let tests_passed = set
        .outcomes
        .iter()
        .filter(|o| o.status == TestStatus::Passed)
        .count() as u32;
    let tests_failed = tests_total - tests_passed;

    let points_earned = spec.points_possible * tests_passed / tests_total;
    let percent = 100 * tests_passed / tests_total;

    let state = if tests_failed == 0 {
        ExerciseState::Approved
    } else if tests_passed > 0 {
        ExerciseState::Partial
    } else {
        ExerciseState::Failed
    };

    let details = set
        .outcomes
        .iter()
        .map(|o| TestDetail {
            name: o.title.clone(),
            status: o.status,
            duration_ms: o.duration_ms,
        })
        .collect();

    ExerciseReport {
        exercise_id: spec.id,
        name: spec.name.to_string(),
        state,
        tests_total,
        tests_passed,
        tests_failed,
        points_possible: spec.points_possible,
        points_earned,
        percent,
        details,
    }
}

fn not_run(spec: &ExerciseSpec) -> ExerciseReport {
    ExerciseReport {
        exercise_id: spec.id,
        name: spec.name.to_string(),
        state: ExerciseState::NotRun,
        tests_total: 0,
        tests_passed: 0,
        tests_failed: 0,
        points_possible: spec.points_possible,
        points_earned: 0,
        percent: 0,
        details: vec![],
    }
}

fn count_state(exercises: &[ExerciseReport], state: ExerciseState) -> u32 {
    exercises.iter().filter(|e| e.state == state).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use classgrade_common::types::RawTestOutcome;

    /// Helper to build a result set with `passed` passing and `failed`
    /// failing outcomes.
    fn make_set(identifier: &str, passed: u32, failed: u32) -> RawResultSet {
        let mut outcomes = Vec::new();
        for i in 0..passed {
            outcomes.push(RawTestOutcome {
                title: format!("passing test {}", i + 1),
                status: TestStatus::Passed,
                duration_ms: 10,
            });
        }
        for i in 0..failed {
            outcomes.push(RawTestOutcome {
                title: format!("failing test {}", i + 1),
                status: TestStatus::Failed,
                duration_ms: 10,
            });
        }
        RawResultSet {
            identifier: identifier.to_string(),
            outcomes,
        }
    }

    fn make_run(success: bool, result_sets: Vec<RawResultSet>) -> RawRunResult {
        let total: u32 = result_sets.iter().map(|s| s.outcomes.len() as u32).sum();
        let passed: u32 = result_sets
            .iter()
            .flat_map(|s| &s.outcomes)
            .filter(|o| o.status == TestStatus::Passed)
            .count() as u32;
        RawRunResult {
            success,
            total_tests: total,
            passed_tests: passed,
            failed_tests: total - passed,
            result_sets,
        }
    }

    #[test]
    fn test_absent_exercises_are_not_run_with_zero_points() {
        let raw = make_run(true, vec![]);
        let report = aggregate(&raw);

        assert_eq!(report.exercises.len(), 7);
        for exercise in &report.exercises {
            assert_eq!(exercise.state, ExerciseState::NotRun);
            assert_eq!(exercise.points_earned, 0);
            assert_eq!(exercise.tests_total, 0);
        }
        assert_eq!(report.summary.points_earned, 0);
    }

    #[test]
    fn test_full_pass_earns_full_weight() {
        let raw = make_run(
            true,
            vec![make_set("/repo/tests/1-git-init.test.js", 5, 0)],
        );
        let report = aggregate(&raw);

        let ex1 = &report.exercises[0];
        assert_eq!(ex1.state, ExerciseState::Approved);
        assert_eq!(ex1.tests_passed, 5);
        assert_eq!(ex1.points_earned, 15);
        assert_eq!(ex1.percent, 100);
    }

    #[test]
    fn test_proportional_points_are_floored() {
        // 2 of 3 passed on a 15-point exercise: floor(15 * 2/3) = 10,
        // floor(100 * 2/3) = 66
        let raw = make_run(
            false,
            vec![make_set("/repo/tests/2-first-commit.test.js", 2, 1)],
        );
        let report = aggregate(&raw);

        let ex2 = &report.exercises[1];
        assert_eq!(ex2.state, ExerciseState::Partial);
        assert_eq!(ex2.points_earned, 10);
        assert_eq!(ex2.percent, 66);
    }

    #[test]
    fn test_state_derivation() {
        let raw = make_run(
            false,
            vec![
                make_set("/repo/tests/1-git-init.test.js", 3, 0),
                make_set("/repo/tests/2-first-commit.test.js", 1, 2),
                make_set("/repo/tests/3-amend-commits.test.js", 0, 4),
            ],
        );
        let report = aggregate(&raw);

        assert_eq!(report.exercises[0].state, ExerciseState::Approved);
        assert_eq!(report.exercises[1].state, ExerciseState::Partial);
        assert_eq!(report.exercises[2].state, ExerciseState::Failed);
        assert_eq!(report.exercises[3].state, ExerciseState::NotRun);
        assert_eq!(report.summary.complete_count, 1);
        assert_eq!(report.summary.partial_count, 1);
        assert_eq!(report.summary.failed_count, 1);
    }

    #[test]
    fn test_matched_but_empty_set_counts_as_not_run() {
        let raw = make_run(
            true,
            vec![make_set("/repo/tests/5-github-push.test.js", 0, 0)],
        );
        let report = aggregate(&raw);

        assert_eq!(report.exercises[4].state, ExerciseState::NotRun);
        assert_eq!(report.exercises[4].points_earned, 0);
    }

    #[test]
    fn test_non_passed_non_failed_statuses_earn_nothing() {
        let mut set = make_set("/repo/tests/6-pull-clone.test.js", 1, 0);
        set.outcomes.push(RawTestOutcome {
            title: "skipped test".to_string(),
            status: TestStatus::Other,
            duration_ms: 0,
        });
        let raw = make_run(false, vec![set]);
        let report = aggregate(&raw);

        let ex6 = &report.exercises[5];
        assert_eq!(ex6.tests_total, 2);
        assert_eq!(ex6.tests_passed, 1);
        assert_eq!(ex6.tests_failed, 1);
        // floor(10 * 1/2) = 5
        assert_eq!(ex6.points_earned, 5);
        assert_eq!(ex6.state, ExerciseState::Partial);
    }

    #[test]
    fn test_summary_points_equal_exercise_sum() {
        let raw = make_run(
            false,
            vec![
                make_set("/repo/tests/1-git-init.test.js", 5, 0),
                make_set("/repo/tests/4-branches.test.js", 2, 2),
                make_set("/repo/tests/6-pull-clone.test.js", 0, 3),
            ],
        );
        let report = aggregate(&raw);

        let sum: u32 = report.exercises.iter().map(|e| e.points_earned).sum();
        assert_eq!(sum, report.summary.points_earned);
        // 15 + floor(15 * 2/4) + 0 = 22
        assert_eq!(report.summary.points_earned, 22);
        assert_eq!(report.summary.percent_final, 22);
    }

    #[test]
    fn test_grand_totals_come_from_run_counters() {
        // Counters deliberately disagree with the per-set outcomes; the
        // summary must echo the counters, not recompute.
        let raw = RawRunResult {
            success: true,
            total_tests: 40,
            passed_tests: 39,
            failed_tests: 1,
            result_sets: vec![make_set("/repo/tests/1-git-init.test.js", 5, 0)],
        };
        let report = aggregate(&raw);

        assert_eq!(report.summary.total_tests, 40);
        assert_eq!(report.summary.tests_passed, 39);
        assert_eq!(report.summary.tests_failed, 1);
    }

    #[test]
    fn test_details_carry_titles_and_durations() {
        let raw = make_run(
            true,
            vec![make_set("/repo/tests/7-merge-conflicts.test.js", 2, 0)],
        );
        let report = aggregate(&raw);

        let ex7 = &report.exercises[6];
        assert_eq!(ex7.details.len(), 2);
        assert_eq!(ex7.details[0].name, "passing test 1");
        assert_eq!(ex7.details[0].status, TestStatus::Passed);
        assert_eq!(ex7.details[0].duration_ms, 10);
    }

    #[test]
    fn test_first_matching_set_wins() {
        let raw = make_run(
            false,
            vec![
                make_set("/a/1-git-init.test.js", 1, 1),
                make_set("/b/1-git-init.test.js", 2, 0),
            ],
        );
        let report = aggregate(&raw);

        assert_eq!(report.exercises[0].tests_total, 2);
        assert_eq!(report.exercises[0].tests_passed, 1);
    }

    #[test]
    fn test_end_to_end_exercise_one_passing_exercise_two_absent() {
        let raw = make_run(
            true,
            vec![make_set("/repo/tests/1-git-init.test.js", 5, 0)],
        );
        let report = aggregate(&raw);

        let ex1 = &report.exercises[0];
        assert_eq!(ex1.state, ExerciseState::Approved);
        assert_eq!(ex1.points_earned, 15);
        assert_eq!(ex1.points_possible, 15);

        let ex2 = &report.exercises[1];
        assert_eq!(ex2.state, ExerciseState::NotRun);
        assert_eq!(ex2.points_earned, 0);
        assert_eq!(ex2.points_possible, 15);

        assert_eq!(report.summary.points_earned, 15);
        assert_eq!(report.summary.percent_final, 15);
    }

    #[test]
    fn test_empty_report_shape() {
        let report = empty_report();

        assert!(!report.success);
        assert_eq!(report.exercises.len(), 7);
        assert!(report
            .exercises
            .iter()
            .all(|e| e.state == ExerciseState::NotRun && e.points_earned == 0));
        assert_eq!(report.summary.points_total, catalog::TOTAL_POINTS);
        assert_eq!(report.summary.points_earned, 0);
        assert_eq!(report.summary.total_tests, 0);
    }

    #[test]
    fn test_success_flag_is_carried_through() {
        let raw = make_run(true, vec![make_set("/t/1-git-init.test.js", 1, 0)]);
        assert!(aggregate(&raw).success);

        let raw = make_run(false, vec![make_set("/t/1-git-init.test.js", 0, 1)]);
        assert!(!aggregate(&raw).success);
    }
}
