//! Summary metrics for one validation run.
//!
//! Metrics are informational. They never influence the verdict, which
//! depends only on the error list.

use serde::{Deserialize, Serialize};

use crate::duplication::DuplicationReport;
use crate::scanner::ProjectScan;

/// Counts folded from the scan, the duplication report, and the toolchain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub components_created: usize,
    pub types_defined: usize,
    pub mock_files: usize,
    pub total_lines: usize,
    /// 0 when the type check was skipped, unavailable, or timed out.
    pub typescript_errors: usize,
    /// Total collisions across all duplication categories.
    pub duplication_score: usize,
}

impl RunMetrics {
    /// Aggregate metrics for a scan.
    pub fn aggregate(
        scan: &ProjectScan,
        duplicates: &DuplicationReport,
        typescript_errors: usize,
    ) -> Self {
        Self {
            components_created: scan.components.len(),
            types_defined: scan
                .types_file
                .as_ref()
                .map(|t| t.exported().count())
                .unwrap_or(0),
            mock_files: scan.data_files.len(),
            total_lines: scan.source_lines,
            typescript_errors,
            duplication_score: duplicates.total(),
        }
    }

    /// Emit all values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            components_created = self.components_created,
            types_defined = self.types_defined,
            mock_files = self.mock_files,
            total_lines = self.total_lines,
            typescript_errors = self.typescript_errors,
            duplication_score = self.duplication_score,
        );
    }
}
