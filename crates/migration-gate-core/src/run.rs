//! The per-invocation accumulator: findings, metrics, duplication report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::duplication::DuplicationReport;
use crate::finding::{Finding, Severity};
use crate::metrics::RunMetrics;

/// Which half of the gate a run belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PreFlight,
    PostFlight,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreFlight => "pre_flight",
            Self::PostFlight => "post_flight",
        }
    }
}

/// Final gate decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
}

/// Mutable state for one validation invocation.
///
/// Created fresh per invocation and never persisted; nothing carries over
/// between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRun {
    pub run_id: Uuid,
    pub phase: Phase,
    pub started_at: DateTime<Utc>,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub metrics: RunMetrics,
    pub duplicates: DuplicationReport,
}

impl ValidationRun {
    pub fn new(phase: Phase) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            phase,
            started_at: Utc::now(),
            errors: Vec::new(),
            warnings: Vec::new(),
            metrics: RunMetrics::default(),
            duplicates: DuplicationReport::default(),
        }
    }

    /// Route a finding into the error or warning sequence by severity.
    pub fn record(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        for finding in findings {
            self.record(finding);
        }
    }

    /// A run passes iff no error was recorded. Warnings and metrics never
    /// affect the outcome.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn verdict(&self) -> Verdict {
        if self.passed() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    /// Process exit code for the CLI: 0 on pass, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
