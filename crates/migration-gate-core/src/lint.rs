//! Structural linting of generated data records and UI artifacts.
//!
//! Record checks parse real JSON. UI checks are textual heuristics over raw
//! component source: a table of `(signature, severity, message)` entries
//! evaluated with regular expressions. They can both over- and under-report
//! and are advisory only. Swapping them for a real parser must not change
//! [`StructuralLinter`]'s interface.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::config::{ContractConfig, GateConfig, LimitsConfig};
use crate::duplication::display_id;
use crate::finding::{Finding, FindingCategory, Severity};
use crate::scanner::{ComponentArtifact, DataFile, ProjectScan, TypesFile};

/// A deprecated-pattern signature.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub signature: &'static str,
    pub severity: Severity,
    pub message: &'static str,
}

/// Legacy dynamic-component directive and legacy store APIs.
pub const DEPRECATED_PATTERNS: &[PatternRule] = &[
    PatternRule {
        signature: r"<svelte:component\s+this=",
        severity: Severity::Warning,
        message: "Deprecated <svelte:component>",
    },
    PatternRule {
        signature: r#"from\s+["']svelte/store["']"#,
        severity: Severity::Warning,
        message: "Deprecated stores (use runes)",
    },
    PatternRule {
        signature: r"\bwritable\(",
        severity: Severity::Warning,
        message: "Deprecated writable store (use $state)",
    },
    PatternRule {
        signature: r"\breadable\(",
        severity: Severity::Warning,
        message: "Deprecated readable store (use $state)",
    },
    PatternRule {
        // `$derived(` is the rune replacement and must not match
        signature: r"(?:^|[^$\w])derived\(",
        severity: Severity::Warning,
        message: "Deprecated derived store (use $derived)",
    },
];

fn compiled_patterns() -> &'static [(Regex, PatternRule)] {
    static COMPILED: OnceLock<Vec<(Regex, PatternRule)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        DEPRECATED_PATTERNS
            .iter()
            .map(|rule| {
                (
                    Regex::new(rule.signature).expect("deprecated pattern is valid"),
                    *rule,
                )
            })
            .collect()
    })
}

fn icon_button_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<button[^>]*>\s*<svg").expect("icon button pattern is valid"))
}

/// Runs every structural check over one [`ProjectScan`].
pub struct StructuralLinter<'a> {
    config: &'a GateConfig,
}

impl<'a> StructuralLinter<'a> {
    pub fn new(config: &'a GateConfig) -> Self {
        Self { config }
    }

    pub fn lint(&self, scan: &ProjectScan) -> Vec<Finding> {
        let mut findings = Vec::new();
        findings.extend(lint_type_definitions(
            scan.types_file.as_ref(),
            &self.config.layout.types_file.display().to_string(),
            &self.config.contracts,
        ));
        findings.extend(lint_data_files(&scan.data_files, &self.config.limits));
        findings.extend(lint_components(&scan.components, &self.config.limits));
        findings
    }
}

/// Parse and shape-check every data file.
pub fn lint_data_files(files: &[DataFile], limits: &LimitsConfig) -> Vec<Finding> {
    files
        .iter()
        .flat_map(|file| lint_data_file(file, limits))
        .collect()
}

pub fn lint_data_file(file: &DataFile, limits: &LimitsConfig) -> Vec<Finding> {
    let warn = |message: String| {
        Finding::warning(FindingCategory::DataStructure, message).in_file(&file.relative_path)
    };

    let data: Value = match serde_json::from_slice(&file.content) {
        Ok(v) => v,
        Err(e) => {
            return vec![Finding::error(
                FindingCategory::DataStructure,
                format!("{}: Invalid JSON - {}", file.name, e),
            )
            .in_file(&file.relative_path)];
        }
    };

    let records = match data {
        Value::Array(records) => records,
        other => {
            return vec![warn(format!(
                "{}: Expected array, got {}",
                file.name,
                json_type_name(&other)
            ))];
        }
    };

    let mut findings = Vec::new();
    if records.len() > limits.max_records_per_file {
        findings.push(warn(format!(
            "{}: {} entries (recommend max {})",
            file.name,
            records.len(),
            limits.max_records_per_file
        )));
    }

    let mut id_counts: BTreeMap<String, (String, usize)> = BTreeMap::new();
    for (i, record) in records.iter().enumerate() {
        let Some(object) = record.as_object() else {
            findings.push(warn(format!("{}[{}]: Not an object", file.name, i)));
            continue;
        };
        match object.get("id") {
            Some(id) => {
                id_counts
                    .entry(id.to_string())
                    .or_insert_with(|| (display_id(id), 0))
                    .1 += 1;
            }
            None => findings.push(warn(format!("{}[{}]: Missing 'id' field", file.name, i))),
        }
    }

    for (id, count) in id_counts.into_values() {
        if count > 1 {
            findings.push(warn(format!(
                "{}: ID '{}' appears {} times",
                file.name, id, count
            )));
        }
    }
    findings
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Deprecated patterns, icon-only buttons without labels, and oversized
/// components.
pub fn lint_components(components: &[ComponentArtifact], limits: &LimitsConfig) -> Vec<Finding> {
    components
        .iter()
        .flat_map(|c| lint_component(c, limits))
        .collect()
}

pub fn lint_component(component: &ComponentArtifact, limits: &LimitsConfig) -> Vec<Finding> {
    let file_name = component
        .relative_path
        .rsplit('/')
        .next()
        .unwrap_or(&component.relative_path);
    let mut findings = Vec::new();

    for (pattern, rule) in compiled_patterns() {
        if pattern.is_match(&component.source) {
            findings.push(
                Finding {
                    severity: rule.severity,
                    category: FindingCategory::ComponentPattern,
                    message: format!("{}: {}", file_name, rule.message),
                    file: None,
                }
                .in_file(&component.relative_path),
            );
        }
    }

    if component.source.contains("<button") {
        for m in icon_button_pattern().find_iter(&component.source) {
            if !m.as_str().contains("aria-label") {
                findings.push(
                    Finding::warning(
                        FindingCategory::Accessibility,
                        format!("{}: Icon button missing aria-label", file_name),
                    )
                    .in_file(&component.relative_path),
                );
            }
        }
    }

    let lines = component.line_count();
    if lines > limits.max_component_lines {
        findings.push(
            Finding::warning(
                FindingCategory::ComponentSize,
                format!(
                    "{}: {} lines (recommend max {})",
                    file_name, lines, limits.max_component_lines
                ),
            )
            .in_file(&component.relative_path),
        );
    }
    findings
}

/// Central types file hygiene: presence, exports, canonical redefinitions.
pub fn lint_type_definitions(
    types_file: Option<&TypesFile>,
    expected_path: &str,
    contracts: &ContractConfig,
) -> Vec<Finding> {
    let Some(types_file) = types_file else {
        return vec![Finding::warning(
            FindingCategory::TypeDefinitions,
            format!("No {} found", expected_path),
        )];
    };

    let mut findings = Vec::new();

    let mut non_exported: Vec<&str> = Vec::new();
    for def in &types_file.definitions {
        let ever_exported = types_file.exported().any(|d| d.name == def.name);
        if !ever_exported && !non_exported.contains(&def.name.as_str()) {
            non_exported.push(def.name.as_str());
        }
    }
    if !non_exported.is_empty() {
        findings.push(
            Finding::warning(
                FindingCategory::TypeDefinitions,
                format!("Non-exported interfaces: {}", non_exported.join(", ")),
            )
            .in_file(&types_file.relative_path),
        );
    }

    for canonical in &contracts.canonical_interfaces {
        let declarations = types_file
            .definitions
            .iter()
            .filter(|d| &d.name == canonical)
            .count();
        if declarations > 1 {
            findings.push(
                Finding::error(
                    FindingCategory::TypeDefinitions,
                    format!(
                        "Multiple {} interface definitions found - should extend existing!",
                        canonical
                    ),
                )
                .in_file(&types_file.relative_path),
            );
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(content: &str) -> DataFile {
        DataFile {
            name: "products.json".to_string(),
            relative_path: "src/lib/data/mock/products.json".to_string(),
            content: content.as_bytes().to_vec(),
        }
    }

    fn component(source: &str) -> ComponentArtifact {
        ComponentArtifact {
            name: "Widget".to_string(),
            category: Some("ui".to_string()),
            relative_path: "src/lib/components/ui/Widget.svelte".to_string(),
            source: source.to_string(),
        }
    }

    fn records(n: usize) -> String {
        let items: Vec<String> = (0..n).map(|i| format!(r#"{{"id": "p{i}"}}"#)).collect();
        format!("[{}]", items.join(","))
    }

    #[test]
    fn test_clean_records_no_findings() {
        let findings = lint_data_file(&data(&records(15)), &LimitsConfig::default());
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[test]
    fn test_over_limit_single_warning() {
        let findings = lint_data_file(&data(&records(16)), &LimitsConfig::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "products.json: 16 entries (recommend max 15)");
        assert!(!findings[0].is_blocking());
    }

    #[test]
    fn test_duplicate_id_within_file_single_warning() {
        let findings = lint_data_file(
            &data(r#"[{"id": "p1"}, {"id": "p2"}, {"id": "p1"}]"#),
            &LimitsConfig::default(),
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "products.json: ID 'p1' appears 2 times");
    }

    #[test]
    fn test_invalid_json_is_blocking_with_position() {
        let findings = lint_data_file(&data("[{\"id\": }]"), &LimitsConfig::default());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].is_blocking());
        assert!(findings[0].message.starts_with("products.json: Invalid JSON"));
        assert!(findings[0].message.contains("line 1"));
    }

    #[test]
    fn test_non_utf8_content_is_invalid_json() {
        let mut file = data("");
        file.content = b"[{\"id\": \"p\xff1\"}]".to_vec();
        let findings = lint_data_file(&file, &LimitsConfig::default());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].is_blocking());
        assert!(findings[0].message.starts_with("products.json: Invalid JSON - "));
        assert!(findings[0].message.contains("line 1"));
    }

    #[test]
    fn test_non_list_and_bad_elements() {
        let findings = lint_data_file(&data(r#"{"id": "p1"}"#), &LimitsConfig::default());
        assert_eq!(findings[0].message, "products.json: Expected array, got object");

        let findings = lint_data_file(&data(r#"[1, {"name": "x"}]"#), &LimitsConfig::default());
        let messages: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "products.json[0]: Not an object",
                "products.json[1]: Missing 'id' field"
            ]
        );
    }

    #[test]
    fn test_deprecated_store_patterns() {
        let source = r#"<script>
import { writable, derived } from 'svelte/store';
const count = writable(0);
const double = derived(count, (c) => c * 2);
</script>"#;
        let findings = lint_component(&component(source), &LimitsConfig::default());
        let messages: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
        assert!(messages.contains(&"Widget.svelte: Deprecated stores (use runes)"));
        assert!(messages.contains(&"Widget.svelte: Deprecated writable store (use $state)"));
        assert!(messages.contains(&"Widget.svelte: Deprecated derived store (use $derived)"));
        assert!(findings.iter().all(|f| !f.is_blocking()));
    }

    #[test]
    fn test_runes_not_flagged() {
        let source = "<script lang=\"ts\">\nlet count = $state(0);\nlet double = $derived(count * 2);\n</script>";
        assert!(lint_component(&component(source), &LimitsConfig::default()).is_empty());
    }

    #[test]
    fn test_svelte_component_directive() {
        let source = "<svelte:component this={Icon} />";
        let findings = lint_component(&component(source), &LimitsConfig::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, FindingCategory::ComponentPattern);
    }

    #[test]
    fn test_icon_button_label() {
        let source = "<button class=\"x\">\n  <svg></svg>\n</button>\n<button aria-label=\"Close\"><svg></svg></button>\n<button>Text</button>";
        let findings = lint_component(&component(source), &LimitsConfig::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, FindingCategory::Accessibility);
        assert_eq!(findings[0].message, "Widget.svelte: Icon button missing aria-label");
    }

    #[test]
    fn test_oversized_component() {
        let source = "<p>line</p>\n".repeat(201);
        let findings = lint_component(&component(&source), &LimitsConfig::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "Widget.svelte: 201 lines (recommend max 200)");
    }

    #[test]
    fn test_type_definitions_hygiene() {
        let contracts = ContractConfig::default();
        let findings = lint_type_definitions(None, "src/lib/types/index.ts", &contracts);
        assert_eq!(findings[0].message, "No src/lib/types/index.ts found");
        assert!(!findings[0].is_blocking());

        let types = TypesFile::from_content(
            "src/lib/types/index.ts",
            "export interface Product {}\ninterface Helper {}\nexport interface Product { extra: string }\n"
                .to_string(),
        );
        let findings = lint_type_definitions(Some(&types), "src/lib/types/index.ts", &contracts);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].message, "Non-exported interfaces: Helper");
        assert!(findings[1].is_blocking());
        assert!(findings[1].message.contains("Multiple Product interface definitions"));
    }

    #[test]
    fn test_product_card_is_not_product() {
        let types = TypesFile::from_content(
            "index.ts",
            "export interface Product {}\nexport interface ProductCardProps {}\n".to_string(),
        );
        let findings = lint_type_definitions(Some(&types), "index.ts", &ContractConfig::default());
        assert!(findings.is_empty());
    }
}
