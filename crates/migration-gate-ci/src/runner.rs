//! Subprocess execution for the type-check command.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::command::ToolchainCommand;

/// What happened when the type-check command was invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolchainOutcome {
    /// The process ran to completion within the timeout.
    Completed {
        /// Captured stdout followed by captured stderr.
        output: String,
        /// `-1` when terminated by a signal.
        exit_code: i32,
        duration_ms: u64,
    },

    /// The timeout elapsed; the child was killed.
    TimedOut { timeout_secs: u64, duration_ms: u64 },

    /// The program could not be started on this host.
    Unavailable { reason: String },

    /// The process started but its output could not be collected.
    Failed { reason: String, duration_ms: u64 },
}

impl ToolchainOutcome {
    /// Short label for structured events.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::TimedOut { .. } => "timed_out",
            Self::Unavailable { .. } => "unavailable",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Completed { duration_ms, .. }
            | Self::TimedOut { duration_ms, .. }
            | Self::Failed { duration_ms, .. } => *duration_ms,
            Self::Unavailable { .. } => 0,
        }
    }
}

/// Runs a [`ToolchainCommand`] with a hard wall-clock limit.
pub struct ToolchainRunner;

impl ToolchainRunner {
    /// Invoke the command in `project_root`.
    ///
    /// Never returns an error and never outlives `timeout_secs`: the child
    /// is spawned with `kill_on_drop`, so abandoning it on timeout kills it.
    pub async fn invoke(command: &ToolchainCommand, project_root: &Path) -> ToolchainOutcome {
        if command.program.is_empty() {
            return ToolchainOutcome::Unavailable {
                reason: "empty toolchain command".to_string(),
            };
        }

        let start = Instant::now();
        debug!(command = %command.display(), root = %project_root.display(), "spawning type check");

        let child = match Command::new(&command.program)
            .args(&command.args)
            .current_dir(project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return ToolchainOutcome::Unavailable {
                    reason: format!("{} not found", command.program),
                };
            }
            Err(e) => {
                warn!(program = %command.program, error = %e, "type check could not be started");
                return ToolchainOutcome::Unavailable {
                    reason: format!("{} could not be started ({})", command.program, e),
                };
            }
        };

        let result = tokio::time::timeout(command.timeout(), child.wait_with_output()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Err(_elapsed) => ToolchainOutcome::TimedOut {
                timeout_secs: command.timeout_secs,
                duration_ms,
            },
            Ok(Err(e)) => ToolchainOutcome::Failed {
                reason: e.to_string(),
                duration_ms,
            },
            Ok(Ok(output)) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));
                ToolchainOutcome::Completed {
                    output: text,
                    exit_code: output.status.code().unwrap_or(-1),
                    duration_ms,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cmd(program: &str, args: &[&str], timeout_secs: u64) -> ToolchainCommand {
        ToolchainCommand::new(
            program,
            args.iter().map(|a| a.to_string()).collect(),
            timeout_secs,
        )
    }

    #[tokio::test]
    async fn test_execute_simple_command() {
        let outcome = ToolchainRunner::invoke(&cmd("echo", &["hello"], 60), Path::new(".")).await;
        match outcome {
            ToolchainOutcome::Completed { output, exit_code, .. } => {
                assert_eq!(exit_code, 0);
                assert!(output.contains("hello"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_combines_stdout_and_stderr() {
        let outcome = ToolchainRunner::invoke(
            &cmd("sh", &["-c", "echo out; echo err >&2; exit 3"], 60),
            Path::new("."),
        )
        .await;
        match outcome {
            ToolchainOutcome::Completed { output, exit_code, .. } => {
                assert_eq!(exit_code, 3);
                assert!(output.contains("out"));
                assert!(output.contains("err"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_runs_in_project_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("marker.txt"), "here").expect("write");
        let outcome = ToolchainRunner::invoke(&cmd("ls", &[], 60), dir.path()).await;
        match outcome {
            ToolchainOutcome::Completed { output, .. } => assert!(output.contains("marker.txt")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_returns_control() {
        let start = Instant::now();
        let outcome = ToolchainRunner::invoke(&cmd("sleep", &["5"], 1), Path::new(".")).await;
        assert!(matches!(outcome, ToolchainOutcome::TimedOut { timeout_secs: 1, .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let outcome = ToolchainRunner::invoke(
            &cmd("migration-gate-no-such-toolchain", &[], 5),
            Path::new("."),
        )
        .await;
        assert_eq!(
            outcome,
            ToolchainOutcome::Unavailable {
                reason: "migration-gate-no-such-toolchain not found".to_string()
            }
        );
        assert_eq!(outcome.label(), "unavailable");
    }

    #[tokio::test]
    async fn test_empty_program_is_unavailable() {
        let outcome = ToolchainRunner::invoke(&cmd("", &[], 5), Path::new(".")).await;
        assert!(matches!(outcome, ToolchainOutcome::Unavailable { .. }));
    }
}
