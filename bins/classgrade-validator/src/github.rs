// Machine-readable output for the grading workflow
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::validator::Verdict;

/// Emit `key=value` lines for the CI collaborator.
///
/// `output_file` is the file named by `$GITHUB_OUTPUT` (the caller does the
/// env lookup); lines are appended there under GitHub Actions, and printed
/// to stdout otherwise so a local run still shows what the workflow would
/// receive.
pub fn emit(verdict: &Verdict, output_file: Option<&Path>) -> Result<()> {
    let lines = format!(
        "points={}\npercentage={}\npassed={}\n",
        verdict.points,
        verdict.percent,
        verdict.passed()
    );

    match output_file {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            file.write_all(lines.as_bytes())
                .context("Failed to write workflow outputs")?;
        }
        None => {
            println!("📤 Outputs for the grading workflow:");
            print!("{lines}");
        }
    }

    Ok(())
}
