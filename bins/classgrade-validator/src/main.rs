mod github;
mod validator;

use anyhow::Result;
use clap::Parser;
use classgrade_common::{catalog, report};
use std::path::PathBuf;
use tracing::info;
use validator::{ReportValidator, Verdict};

const RULE_WIDTH: usize = 70;

#[derive(Parser)]
#[command(name = "classgrade-validator")]
#[command(about = "Validate the scoring report before the grading platform consumes it", long_about = None)]
struct Cli {
    /// Path to the scoring report artifact
    #[arg(long, default_value = report::REPORT_FILE)]
    report_path: PathBuf,

    /// Skip the machine-readable workflow output lines
    #[arg(long, default_value = "false")]
    no_ci_output: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    println!("🔍 Validating scoring report...\n");

    let verdict = ReportValidator::new().validate(&cli.report_path);

    if verdict.valid {
        print_success(&verdict, &cli.report_path);
        if !cli.no_ci_output {
            let output_file = std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from);
            github::emit(&verdict, output_file.as_deref())?;
        }
    } else {
        print_failure(&verdict);
    }

    info!(valid = verdict.valid, points = verdict.points, "Validation finished");
    std::process::exit(if verdict.valid { 0 } else { 1 });
}

fn print_success(verdict: &Verdict, report_path: &std::path::Path) {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("✅ VALIDATION PASSED");
    println!("{}", "=".repeat(RULE_WIDTH));

    if !verdict.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &verdict.warnings {
            println!("⚠️  {warning}");
        }
    }

    // Per-exercise listing from the already-validated artifact. Purely
    // cosmetic, so a typed-load failure only skips the listing.
    if let Ok(scoring) = report::load(report_path) {
        println!("\n📊 GRADE SUMMARY:");
        println!("{}", "-".repeat(RULE_WIDTH));
        for exercise in &scoring.exercises {
            println!(
                "{} Exercise {}: {:<20} {}/{} pts",
                exercise.state.icon(),
                exercise.exercise_id,
                exercise.name,
                exercise.points_earned,
                exercise.points_possible
            );
        }
        println!("{}", "-".repeat(RULE_WIDTH));
    }

    println!(
        "🎯 FINAL SCORE: {}/{} points ({}%)",
        verdict.points,
        catalog::TOTAL_POINTS,
        verdict.percent
    );

    if verdict.passed() {
        println!("🎉 PASSED!");
    } else {
        println!("📚 Keep working on the exercises");
    }

    println!("{}\n", "=".repeat(RULE_WIDTH));
}

fn print_failure(verdict: &Verdict) {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("❌ VALIDATION FAILED");
    println!("{}", "=".repeat(RULE_WIDTH));

    for error in &verdict.errors {
        println!("❌ {error}");
    }

    if !verdict.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &verdict.warnings {
            println!("⚠️  {warning}");
        }
    }

    println!("\n📝 To generate a valid report, run:");
    println!("   npm test");
    println!("   git add {}", report::REPORT_FILE);
    println!("   git commit -m \"Add test results\"");
    println!("   git push");
    println!("{}\n", "=".repeat(RULE_WIDTH));
}
