//! Folding a type-check outcome into a validation run.

use migration_gate_core::{emit_toolchain_finished, Finding, FindingCategory, ValidationRun};
use tracing::debug;

use crate::command::ToolchainCommand;
use crate::parser::parse_check_output;
use crate::runner::ToolchainOutcome;

/// Pass/fail rules for the type-check signal:
/// - completed with errors: one headline error plus one error per file
/// - timed out: one error, nothing parsed
/// - unavailable: one warning, the run proceeds without the signal
/// - output collection failed: one error
pub struct ToolchainGate<'a> {
    command: &'a ToolchainCommand,
}

impl<'a> ToolchainGate<'a> {
    pub fn new(command: &'a ToolchainCommand) -> Self {
        Self { command }
    }

    /// Record findings for `outcome` on `run` and return the type-check
    /// error count for metrics (0 unless the command completed).
    pub fn apply(&self, outcome: &ToolchainOutcome, run: &mut ValidationRun) -> usize {
        emit_toolchain_finished(outcome.label(), outcome.duration_ms());
        let display = self.command.display();

        match outcome {
            ToolchainOutcome::Completed {
                output, exit_code, ..
            } => {
                let result = parse_check_output(output);
                debug!(
                    errors = result.errors,
                    warnings = result.warnings,
                    files = result.files.len(),
                    exit_code = *exit_code,
                    "type check parsed"
                );
                if result.errors > 0 {
                    run.record(Finding::error(
                        FindingCategory::Toolchain,
                        format!("{} found {} error(s)", display, result.errors),
                    ));
                    for file in &result.files {
                        run.record(
                            Finding::error(
                                FindingCategory::Toolchain,
                                format!("Type errors in {}", file),
                            )
                            .in_file(file),
                        );
                    }
                } else if *exit_code != 0 {
                    run.record(Finding::warning(
                        FindingCategory::Toolchain,
                        format!(
                            "{} exited with code {} but reported no errors",
                            display, exit_code
                        ),
                    ));
                }
                result.errors
            }
            ToolchainOutcome::TimedOut { timeout_secs, .. } => {
                run.record(Finding::error(
                    FindingCategory::Toolchain,
                    format!("{} timed out after {} seconds", display, timeout_secs),
                ));
                0
            }
            ToolchainOutcome::Unavailable { reason } => {
                run.record(Finding::warning(
                    FindingCategory::Toolchain,
                    format!("{} - skipping type check", reason),
                ));
                0
            }
            ToolchainOutcome::Failed { reason, .. } => {
                run.record(Finding::error(
                    FindingCategory::Toolchain,
                    format!("{} failed: {}", display, reason),
                ));
                0
            }
        }
    }
}
