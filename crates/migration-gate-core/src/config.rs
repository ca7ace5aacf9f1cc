//! Gate configuration: project layout, limits, contract parameters, and the
//! external type-check command.
//!
//! Every field has a default matching the conventional SvelteKit layout, so an
//! empty (or absent) config file yields a fully usable [`GateConfig`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GateError, Result};

/// Top-level gate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub layout: LayoutConfig,
    pub limits: LimitsConfig,
    pub contracts: ContractConfig,
    pub toolchain: ToolchainConfig,
}

/// Where generated artifacts live, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub components_dir: PathBuf,
    pub types_file: PathBuf,
    pub data_dir: PathBuf,
    pub source_dir: PathBuf,
    pub component_extension: String,
    pub data_extension: String,
    pub source_extensions: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            components_dir: PathBuf::from("src/lib/components"),
            types_file: PathBuf::from("src/lib/types/index.ts"),
            data_dir: PathBuf::from("src/lib/data/mock"),
            source_dir: PathBuf::from("src"),
            component_extension: "svelte".to_string(),
            data_extension: "json".to_string(),
            source_extensions: vec!["svelte".to_string(), "ts".to_string(), "js".to_string()],
        }
    }
}

/// Recommended size bounds. Exceeding them is advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_records_per_file: usize,
    pub max_component_lines: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_records_per_file: 15,
            max_component_lines: 200,
        }
    }
}

/// Project-specific names referenced by instruction contracts and type hygiene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Shared card component page builders must reuse when it exists.
    pub shared_card_component: String,

    /// Interfaces that must be declared exactly once; redefinitions block.
    pub canonical_interfaces: Vec<String>,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            shared_card_component: "ProductCard".to_string(),
            canonical_interfaces: vec!["Product".to_string()],
        }
    }
}

/// External type-check command, run in the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub program: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: "npm".to_string(),
            args: vec!["run".to_string(), "check".to_string()],
            timeout_secs: 60,
        }
    }
}

impl ToolchainConfig {
    /// The invocation as an operator would type it, e.g. `npm run check`.
    pub fn display_command(&self) -> String {
        command_line(&self.program, &self.args)
    }
}

/// `program` followed by `args`, space separated.
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

impl GateConfig {
    /// Parse a TOML document. Missing sections and keys fall back to defaults.
    pub fn from_toml_str(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Load from an optional TOML file; `None` yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|e| GateError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&raw).map_err(|e| GateError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate().map_err(|reason| GateError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    /// Reject values that parse but cannot mean anything useful.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.toolchain.timeout_secs == 0 {
            return Err("toolchain.timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }
}
