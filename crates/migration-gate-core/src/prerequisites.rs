//! Foundational scaffolding that must exist before any agent may run.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::finding::{Finding, FindingCategory};

/// Outcome of the prerequisite check. Every missing path is reported, not
/// just the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrerequisiteReport {
    pub missing: Vec<PathBuf>,
}

impl PrerequisiteReport {
    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn findings(&self) -> Vec<Finding> {
        self.missing
            .iter()
            .map(|path| {
                Finding::error(
                    FindingCategory::Prerequisite,
                    format!("Stage 0 incomplete: {} does not exist", path.display()),
                )
                .in_file(path.display().to_string())
            })
            .collect()
    }
}

/// The mandatory paths, relative to the project root.
pub fn required_paths(layout: &LayoutConfig) -> [&Path; 3] {
    [
        layout.components_dir.as_path(),
        layout.types_file.as_path(),
        layout.data_dir.as_path(),
    ]
}

/// Read-only existence checks for the component directory, the central
/// types file, and the data directory.
pub fn check_prerequisites(root: &Path, layout: &LayoutConfig) -> PrerequisiteReport {
    let missing = required_paths(layout)
        .into_iter()
        .filter(|rel| !root.join(rel).exists())
        .map(Path::to_path_buf)
        .collect();
    PrerequisiteReport { missing }
}
