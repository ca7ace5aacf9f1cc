//! Shared plumbing for the `validate-pre` and `validate-post` binaries.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use migration_gate_core::GateConfig;
use serde::Serialize;
use tracing::Level;

/// Flags common to both validators.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// TOML file overriding the default layout, limits, and toolchain
    #[arg(long, env = "MIGRATION_GATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the structured result as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    pub log_json: bool,
}

impl CommonArgs {
    /// Logs go to stderr; stdout carries only the report.
    pub fn init_tracing(&self) {
        let level = if self.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        };
        migration_gate_core::init_tracing(self.log_json, level);
    }

    pub fn load_config(&self) -> Result<GateConfig> {
        GateConfig::load(self.config.as_deref()).context("Failed to load gate configuration")
    }

    /// Print either the JSON form of `value` or the rendered text report.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
            println!("{}", json);
        } else {
            print!("{}", text());
        }
        Ok(())
    }
}
