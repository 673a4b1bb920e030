mod adapter;
mod aggregator;
mod console;
mod runner;

use anyhow::Result;
use clap::Parser;
use classgrade_common::report;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "classgrade-runner")]
#[command(about = "Run the exercise tests and generate the scoring report", long_about = None)]
struct Cli {
    /// Command line used to invoke the test runner
    #[arg(long, default_value = "npm test -- --json --testLocationInResults")]
    test_command: String,

    /// Where to write the scoring report artifact
    #[arg(long, default_value = report::REPORT_FILE)]
    report_path: PathBuf,
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

    println!("🚀 Starting exercise evaluation\n");

    let command = runner::TestCommand::parse(&cli.test_command)?;

    // Any failure up to and including payload parsing degrades to the empty
    // report; a report artifact must always exist for the validator.
    let scoring = match runner::run_tests(&command) {
        Ok(stdout) => match adapter::parse_payload(&stdout) {
            Ok(raw) => aggregator::aggregate(&raw),
            Err(e) => {
                warn!(error = %e, "Test runner payload was not parseable");
                aggregator::empty_report()
            }
        },
        Err(e) => {
            error!(error = %e, "Test runner invocation failed");
            aggregator::empty_report()
        }
    };

    report::save(&scoring, &cli.report_path)?;
    info!(
        path = %cli.report_path.display(),
        points = scoring.summary.points_earned,
        "Scoring report written"
    );
    println!("✅ Results saved to: {}\n", cli.report_path.display());

    console::print_report(&scoring);

    // Exit 0 only when the underlying run passed everything.
    std::process::exit(if scoring.success { 0 } else { 1 });
}
