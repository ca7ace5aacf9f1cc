//! Migration Gate CI - external type check and post-flight orchestration
//!
//! Provides:
//! - A bounded-time subprocess runner for the project's type-check command
//! - Parsing of its textual output into error/warning counts and files
//! - The gate folding that outcome into a `ValidationRun`
//! - The post-flight pipeline tying static checks and the type check together

pub mod command;
pub mod gate;
pub mod parser;
pub mod pipeline;
pub mod runner;

pub use command::ToolchainCommand;
pub use gate::ToolchainGate;
pub use parser::{parse_check_output, ToolchainResult};
pub use pipeline::PostFlight;
pub use runner::{ToolchainOutcome, ToolchainRunner};
