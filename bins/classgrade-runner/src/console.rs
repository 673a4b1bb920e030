// Console rendering of the scoring report
use classgrade_common::types::ScoringReport;

const RULE_WIDTH: usize = 70;

/// Print the human-readable results report.
pub fn print_report(report: &ScoringReport) {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("📊 RESULTS REPORT - GIT EXERCISES");
    println!("{}\n", "=".repeat(RULE_WIDTH));

    for exercise in &report.exercises {
        println!(
            "{} Exercise {}: {}",
            exercise.state.icon(),
            exercise.exercise_id,
            exercise.name
        );
        println!(
            "   Tests: {}/{} passed",
            exercise.tests_passed, exercise.tests_total
        );
        println!(
            "   Points: {}/{} ({}%)",
            exercise.points_earned, exercise.points_possible, exercise.percent
        );
        println!();
    }

    let summary = &report.summary;
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("FINAL SUMMARY:");
    println!("{}", "-".repeat(RULE_WIDTH));
    println!(
        "Tests passed: {}/{}",
        summary.tests_passed, summary.total_tests
    );
    println!(
        "Complete exercises: {}/{}",
        summary.complete_count, summary.total_exercises
    );
    println!(
        "\n🎯 FINAL SCORE: {}/{} points",
        summary.points_earned, summary.points_total
    );
    println!("   Percentage: {}%", summary.percent_final);
    println!("{}\n", "=".repeat(RULE_WIDTH));
}
