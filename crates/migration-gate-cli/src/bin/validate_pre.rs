//! `validate-pre`: check Stage 0 prerequisites and a proposed agent
//! instruction before the agent runs.
//!
//! Exit code 0 when no blocking error was found, 1 otherwise.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use migration_gate_cli::CommonArgs;
use migration_gate_core::{render_preflight, AgentType, PreFlight};

#[derive(Parser)]
#[command(name = "validate-pre")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pre-flight validation before a migration agent runs", long_about = None)]
#[command(after_help = agent_help())]
struct Cli {
    /// Root of the project being migrated
    project_root: PathBuf,

    /// Agent about to run
    agent_type: String,

    /// Proposed instruction text to check against the agent's contract
    instruction_file: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

fn agent_help() -> String {
    format!("Agent types: {}", AgentType::supported())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.common.init_tracing();
    let config = cli.common.load_config()?;

    let report = PreFlight::new(&config)
        .run(
            &cli.project_root,
            &cli.agent_type,
            cli.instruction_file.as_deref(),
        )
        .with_context(|| {
            format!(
                "Pre-flight validation could not run for {}",
                cli.project_root.display()
            )
        })?;

    cli.common.emit(&report, || render_preflight(&report))?;
    std::process::exit(report.run.exit_code());
}
