//! Findings: single reported issues with a severity, category, and message.

use serde::{Deserialize, Serialize};

/// Severity of a finding. Errors block the gate; warnings only advise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// Which check produced a finding. Drives report grouping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Prerequisite,
    Instruction,
    Scan,
    TypeDefinitions,
    DataStructure,
    ComponentPattern,
    Accessibility,
    ComponentSize,
    Toolchain,
}

impl FindingCategory {
    /// Section heading used by the text report.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Prerequisite => "Prerequisites",
            Self::Instruction => "Instruction contract",
            Self::Scan => "Artifact scan",
            Self::TypeDefinitions => "Type definitions",
            Self::DataStructure => "Data records",
            Self::ComponentPattern => "Deprecated patterns",
            Self::Accessibility => "Accessibility",
            Self::ComponentSize => "Component size",
            Self::Toolchain => "Type check",
        }
    }
}

/// One issue instance. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: FindingCategory,
    pub message: String,
    pub file: Option<String>,
}

impl Finding {
    pub fn error(category: FindingCategory, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            category,
            message: message.into(),
            file: None,
        }
    }

    pub fn warning(category: FindingCategory, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            category,
            message: message.into(),
            file: None,
        }
    }

    /// Attach the file this finding refers to.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn test_finding_builders() {
        let f = Finding::error(FindingCategory::DataStructure, "bad json").in_file("a.json");
        assert!(f.is_blocking());
        assert_eq!(f.file.as_deref(), Some("a.json"));

        let w = Finding::warning(FindingCategory::Accessibility, "missing label");
        assert!(!w.is_blocking());
        assert!(w.file.is_none());
    }

    #[test]
    fn test_finding_serializes_snake_case() {
        let f = Finding::warning(FindingCategory::ComponentPattern, "legacy store");
        let json = serde_json::to_value(&f).expect("serialize");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["category"], "component_pattern");
    }
}
