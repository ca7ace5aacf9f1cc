//! Type-check command definition.

use std::time::Duration;

use migration_gate_core::config::command_line;
use migration_gate_core::ToolchainConfig;
use serde::{Deserialize, Serialize};

/// The external type-check invocation, run in the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainCommand {
    /// Executable looked up on `PATH`.
    pub program: String,

    /// Arguments passed verbatim.
    pub args: Vec<String>,

    /// Wall-clock limit in seconds.
    pub timeout_secs: u64,
}

impl ToolchainCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            program: program.into(),
            args,
            timeout_secs,
        }
    }

    pub fn from_config(config: &ToolchainConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone(), config.timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The invocation as an operator would type it, e.g. `npm run check`.
    pub fn display(&self) -> String {
        command_line(&self.program, &self.args)
    }
}

impl Default for ToolchainCommand {
    fn default() -> Self {
        Self::from_config(&ToolchainConfig::default())
    }
}
