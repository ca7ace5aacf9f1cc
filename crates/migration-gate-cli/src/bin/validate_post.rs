//! `validate-post`: duplication, structural lint, and the project's type
//! check after an agent has run.
//!
//! Exit code 0 when no blocking error was found, 1 otherwise.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use migration_gate_ci::PostFlight;
use migration_gate_cli::CommonArgs;
use migration_gate_core::render_postflight;

#[derive(Parser)]
#[command(name = "validate-post")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Post-flight validation after a migration agent has run", long_about = None)]
struct Cli {
    /// Root of the project being migrated
    project_root: PathBuf,

    /// Do not invoke the external type-check command
    #[arg(long)]
    skip_toolchain_check: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.common.init_tracing();
    let config = cli.common.load_config()?;

    let run = PostFlight::new(&config)
        .run(&cli.project_root, cli.skip_toolchain_check)
        .await
        .with_context(|| {
            format!(
                "Post-flight validation could not run for {}",
                cli.project_root.display()
            )
        })?;

    cli.common.emit(&run, || render_postflight(&run))?;
    std::process::exit(run.exit_code());
}
