/// Test Collaborator Invocation
///
/// **Responsibility:**
/// Run the external test command as a subprocess and hand its stdout payload
/// to the adapter.
///
/// **Exit-code convention:**
/// The runner exits non-zero whenever any test fails, but in that case it
/// still prints a complete JSON payload on stdout. A non-zero exit is
/// therefore not an invocation failure here; only a spawn error or an empty
/// stdout is.
use anyhow::{bail, Context, Result};
use std::process::Command;
use tracing::{info, warn};

/// Parsed form of the `--test-command` CLI argument.
#[derive(Debug, Clone)]
pub struct TestCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl TestCommand {
    /// Split a command line on whitespace. Quoting is not supported; the
    /// default command has no arguments that would need it.
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let Some(program) = parts.next() else {
            bail!("Test command cannot be empty");
        };
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

/// Invoke the test command and return its stdout.
///
/// Errors only when the process cannot be spawned or produced no payload at
/// all; the caller decides whether the payload itself is usable.
pub fn run_tests(cmd: &TestCommand) -> Result<String> {
    info!(program = %cmd.program, "Invoking test runner");

    let output = Command::new(&cmd.program)
        .args(&cmd.args)
        .env("CI", "true")
        .output()
        .with_context(|| format!("Failed to invoke test runner '{}'", cmd.program))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

    if !output.status.success() {
        // Expected whenever tests fail; the payload is still on stdout.
        warn!(
            code = output.status.code().unwrap_or(-1),
            "Test runner exited non-zero"
        );
    }

    if stdout.trim().is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "Test runner produced no output on stdout (stderr: {})",
            stderr.trim()
        );
    }

    Ok(stdout)
}
