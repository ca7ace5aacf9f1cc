//! Migration Gate Core
//!
//! Validation logic guarding a staged, multi-agent static-site migration:
//! - pre-flight: prerequisites and per-agent instruction contracts
//! - post-flight: duplication detection and structural linting
//! - metrics aggregation and report rendering
//!
//! The external type check lives in `migration-gate-ci`.

pub mod config;
pub mod contract;
pub mod duplication;
pub mod error;
pub mod finding;
pub mod lint;
pub mod metrics;
pub mod obs;
pub mod postflight;
pub mod preflight;
pub mod prerequisites;
pub mod report;
pub mod run;
pub mod scanner;
pub mod telemetry;

pub use config::{ContractConfig, GateConfig, LayoutConfig, LimitsConfig, ToolchainConfig};
pub use contract::{
    check_instruction, AgentContract, AgentType, Check, Clause, ContractContext,
    InstructionVerdict, Marker, UnknownAgentType,
};
pub use duplication::{detect_duplicates, DuplicationReport};
pub use error::{GateError, Result};
pub use finding::{Finding, FindingCategory, Severity};
pub use lint::StructuralLinter;
pub use metrics::RunMetrics;
pub use obs::{
    emit_check_completed, emit_run_finished, emit_run_started, emit_toolchain_finished, run_span,
    RunSpan,
};
pub use postflight::run_static_checks;
pub use preflight::{ContextSummary, PreFlight, PreFlightReport};
pub use prerequisites::{check_prerequisites, PrerequisiteReport};
pub use report::{render_postflight, render_preflight};
pub use run::{Phase, ValidationRun, Verdict};
pub use scanner::{ArtifactScanner, ProjectScan};
pub use telemetry::init_tracing;

/// Migration gate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
