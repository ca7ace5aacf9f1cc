//! Pre-flight gate: prerequisites, context summary, and the instruction
//! contract for the agent about to run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::config::GateConfig;
use crate::contract::{check_instruction, AgentContract, AgentType, ContractContext};
use crate::duplication::DuplicationReport;
use crate::error::Result;
use crate::finding::{Finding, FindingCategory};
use crate::metrics::RunMetrics;
use crate::obs::{emit_check_completed, emit_run_finished, emit_run_started, RunSpan};
use crate::prerequisites::check_prerequisites;
use crate::run::{Phase, ValidationRun};
use crate::scanner::{ArtifactScanner, ProjectScan};

/// What already exists, in a form an operator can paste into an instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextSummary {
    /// Component names grouped by category directory; uncategorised
    /// components are listed under `components`.
    pub components: BTreeMap<String, Vec<String>>,
    pub types: Vec<String>,
    pub data_files: Vec<String>,
}

impl ContextSummary {
    pub fn from_scan(scan: &ProjectScan) -> Self {
        let mut components: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for c in &scan.components {
            let group = c.category.clone().unwrap_or_else(|| "components".to_string());
            let names = components.entry(group).or_default();
            if !names.contains(&c.name) {
                names.push(c.name.clone());
            }
        }
        Self {
            components,
            types: scan.exported_type_names(),
            data_files: scan.data_file_names(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("EXISTING CODE CONTEXT:\n");
        for (group, names) in &self.components {
            out.push_str(&format!("  {}: {}\n", group, names.join(", ")));
        }
        if !self.types.is_empty() {
            out.push_str(&format!("  types: {}\n", self.types.join(", ")));
        }
        if !self.data_files.is_empty() {
            out.push_str(&format!("  mock: {}\n", self.data_files.join(", ")));
        }
        out
    }
}

/// Structured pre-flight result.
#[derive(Debug, Clone, Serialize)]
pub struct PreFlightReport {
    pub run: ValidationRun,
    pub agent: Option<AgentType>,
    /// Present once prerequisites pass.
    pub context: Option<ContextSummary>,
    pub instruction_checked: bool,
}

impl PreFlightReport {
    pub fn passed(&self) -> bool {
        self.run.passed()
    }
}

/// Pre-flight validator.
pub struct PreFlight<'a> {
    config: &'a GateConfig,
}

impl<'a> PreFlight<'a> {
    pub fn new(config: &'a GateConfig) -> Self {
        Self { config }
    }

    /// Validate `root` before launching `agent_id`, optionally checking the
    /// instruction stored at `instruction_path`.
    ///
    /// Only a missing project root is returned as an error. An unknown agent
    /// type or a missing prerequisite ends the run early with a blocking
    /// finding; everything else accumulates.
    pub fn run(
        &self,
        root: &Path,
        agent_id: &str,
        instruction_path: Option<&Path>,
    ) -> Result<PreFlightReport> {
        ArtifactScanner::ensure_root(root)?;

        let mut run = ValidationRun::new(Phase::PreFlight);
        let _span = RunSpan::enter(&run);
        emit_run_started(&run, root);

        let contract = match AgentContract::lookup(agent_id) {
            Ok(contract) => contract,
            Err(e) => {
                warn!(agent = agent_id, "unknown agent type");
                run.record(Finding::error(FindingCategory::Instruction, e.to_string()));
                return Ok(self.finish(run, None, None, false));
            }
        };

        let prerequisites = check_prerequisites(root, &self.config.layout);
        run.extend(prerequisites.findings());
        emit_check_completed("prerequisites", prerequisites.missing.len(), 0);
        if !prerequisites.passed() {
            return Ok(self.finish(run, Some(contract.agent), None, false));
        }

        let scan = ArtifactScanner::new(root, &self.config.layout).scan()?;
        run.extend(unreadable_findings(&scan));
        run.metrics = RunMetrics::aggregate(&scan, &DuplicationReport::default(), 0);
        let context = ContextSummary::from_scan(&scan);

        let Some(path) = instruction_path else {
            return Ok(self.finish(run, Some(contract.agent), Some(context), false));
        };

        match read_instruction(path) {
            Ok(instruction) => {
                let ctx = ContractContext::from_scan(&scan, self.config);
                let verdict = check_instruction(&contract, &instruction, &ctx);
                let errors = verdict.findings.iter().filter(|f| f.is_blocking()).count();
                emit_check_completed("instruction", errors, verdict.findings.len() - errors);
                run.extend(verdict.findings);
            }
            Err(finding) => run.record(finding),
        }

        Ok(self.finish(run, Some(contract.agent), Some(context), true))
    }

    fn finish(
        &self,
        run: ValidationRun,
        agent: Option<AgentType>,
        context: Option<ContextSummary>,
        instruction_checked: bool,
    ) -> PreFlightReport {
        emit_run_finished(&run);
        PreFlightReport {
            run,
            agent,
            context,
            instruction_checked,
        }
    }
}

fn read_instruction(path: &Path) -> std::result::Result<String, Finding> {
    if !path.is_file() {
        return Err(Finding::error(
            FindingCategory::Instruction,
            format!("Instruction file not found: {}", path.display()),
        ));
    }
    std::fs::read_to_string(path).map_err(|e| {
        Finding::error(
            FindingCategory::Instruction,
            format!("Instruction file unreadable: {} ({})", path.display(), e),
        )
        .in_file(path.display().to_string())
    })
}

/// Read failures during the scan surface as warnings.
pub fn unreadable_findings(scan: &ProjectScan) -> Vec<Finding> {
    scan.unreadable
        .iter()
        .map(|u| {
            Finding::warning(
                FindingCategory::Scan,
                format!("{}: unreadable ({})", u.relative_path, u.reason),
            )
            .in_file(&u.relative_path)
        })
        .collect()
}
