//! Post-flight orchestration: one scan, the static checks, then the
//! type-check gate, then metrics.

use std::path::Path;

use migration_gate_core::{
    emit_run_finished, emit_run_started, run_span, run_static_checks, ArtifactScanner,
    GateConfig, Phase, Result, RunMetrics, ValidationRun,
};
use tracing::{info, Instrument};

use crate::command::ToolchainCommand;
use crate::gate::ToolchainGate;
use crate::runner::ToolchainRunner;

/// Post-flight validation of one project root.
pub struct PostFlight<'a> {
    config: &'a GateConfig,
}

impl<'a> PostFlight<'a> {
    pub fn new(config: &'a GateConfig) -> Self {
        Self { config }
    }

    /// Run every post-flight check and return the finished run.
    ///
    /// Fails fast only when the project root is unusable. Everything else,
    /// including a hung or missing toolchain, becomes a finding.
    pub async fn run(&self, project_root: &Path, skip_toolchain: bool) -> Result<ValidationRun> {
        ArtifactScanner::ensure_root(project_root)?;
        let run = ValidationRun::new(Phase::PostFlight);
        let span = run_span(&run);
        self.execute(project_root, skip_toolchain, run)
            .instrument(span)
            .await
    }

    async fn execute(
        &self,
        project_root: &Path,
        skip_toolchain: bool,
        mut run: ValidationRun,
    ) -> Result<ValidationRun> {
        emit_run_started(&run, project_root);

        let scan = ArtifactScanner::new(project_root, &self.config.layout).scan()?;
        run_static_checks(&scan, self.config, &mut run);

        let typescript_errors = if skip_toolchain {
            info!("type check skipped");
            0
        } else {
            let command = ToolchainCommand::from_config(&self.config.toolchain);
            info!(command = %command.display(), timeout_secs = command.timeout_secs, "running type check");
            let outcome = ToolchainRunner::invoke(&command, project_root).await;
            ToolchainGate::new(&command).apply(&outcome, &mut run)
        };

        run.metrics = RunMetrics::aggregate(&scan, &run.duplicates, typescript_errors);
        run.metrics.flush();
        emit_run_finished(&run);
        Ok(run)
    }
}
