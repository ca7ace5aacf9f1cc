//! Structured observability hooks for the validation run lifecycle.
//!
//! - Run-scoped tracing spans via the `RunSpan` RAII guard (or `run_span`
//!   for async callers)
//! - Emission functions for run start, per-check completion, toolchain
//!   completion, and the final verdict

use tracing::info;

use crate::run::ValidationRun;

/// RAII guard that enters a run-scoped span for the duration of a run.
///
/// ```ignore
/// let _span = RunSpan::enter(&run);
/// // every event below is tagged with run_id and phase
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    pub fn enter(run: &ValidationRun) -> Self {
        Self {
            _span: run_span(run).entered(),
        }
    }
}

/// The run-scoped span itself, for instrumenting async work with
/// `tracing::Instrument` instead of holding an entered guard across `.await`.
pub fn run_span(run: &ValidationRun) -> tracing::Span {
    tracing::info_span!(
        "gate.run",
        run_id = %run.run_id,
        phase = run.phase.as_str(),
    )
}

/// Emit event: run started against a project root.
pub fn emit_run_started(run: &ValidationRun, project_root: &std::path::Path) {
    info!(
        event = "run.started",
        run_id = %run.run_id,
        phase = run.phase.as_str(),
        project_root = %project_root.display(),
    );
}

/// Emit event: one check finished with its finding counts.
pub fn emit_check_completed(check: &str, errors: usize, warnings: usize) {
    info!(
        event = "check.completed",
        check = check,
        errors = errors,
        warnings = warnings,
    );
}

/// Emit event: the external type check returned (or did not).
pub fn emit_toolchain_finished(outcome: &str, duration_ms: u64) {
    info!(
        event = "toolchain.finished",
        outcome = outcome,
        duration_ms = duration_ms,
    );
}

/// Emit event: run finished with its verdict.
pub fn emit_run_finished(run: &ValidationRun) {
    info!(
        event = "run.finished",
        run_id = %run.run_id,
        passed = run.passed(),
        errors = run.errors.len(),
        warnings = run.warnings.len(),
    );
}
