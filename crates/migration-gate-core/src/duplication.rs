//! Redundant-artifact detection across components, type definitions, and
//! data records. Discovery only: nothing is corrected.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::scanner::{ComponentArtifact, DataFile, TypesFile};

/// Collision descriptions per category. Empty lists mean no duplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicationReport {
    /// `"<Name>: <path>, <path>"` per colliding component name.
    pub components: Vec<String>,
    /// Interface names declared more than once.
    pub interfaces: Vec<String>,
    /// `"ID '<id>' in: <file>, <file>"` per identifier shared across files.
    pub mock_files: Vec<String>,
}

impl DuplicationReport {
    /// Total collisions across all three categories.
    pub fn total(&self) -> usize {
        self.components.len() + self.interfaces.len() + self.mock_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// `(heading, entries)` pairs for rendering, in fixed order.
    pub fn categories(&self) -> [(&'static str, &[String]); 3] {
        [
            ("Duplicate Components", self.components.as_slice()),
            ("Duplicate Interfaces", self.interfaces.as_slice()),
            ("Duplicate Mock IDs", self.mock_files.as_slice()),
        ]
    }
}

/// Run all three sub-checks.
pub fn detect_duplicates(
    components: &[ComponentArtifact],
    types_file: Option<&TypesFile>,
    data_files: &[DataFile],
) -> DuplicationReport {
    let report = DuplicationReport {
        components: component_collisions(components),
        interfaces: types_file.map(interface_collisions).unwrap_or_default(),
        mock_files: record_id_collisions(data_files),
    };
    debug!(
        components = report.components.len(),
        interfaces = report.interfaces.len(),
        mock_files = report.mock_files.len(),
        "duplication scan complete"
    );
    report
}

/// Group components by base name; report names owned by more than one file.
pub fn component_collisions(components: &[ComponentArtifact]) -> Vec<String> {
    let mut by_name: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for c in components {
        by_name
            .entry(c.name.as_str())
            .or_default()
            .push(c.relative_path.as_str());
    }
    by_name
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(name, paths)| format!("{}: {}", name, paths.join(", ")))
        .collect()
}

/// Exported interface names declared more than once, in order of their
/// first repeat. A positional scan: forward references and any declaration
/// order are fine, but declarations hidden in conditional or templated code
/// are not recognised.
pub fn interface_collisions(types_file: &TypesFile) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut repeated: Vec<String> = Vec::new();
    for def in types_file.exported() {
        if !seen.insert(def.name.as_str()) && !repeated.contains(&def.name) {
            repeated.push(def.name.clone());
        }
    }
    repeated
}

/// Identifiers that occur in records of more than one data file.
///
/// Files that fail to parse, or are not lists, are skipped here; the
/// structural linter reports them.
pub fn record_id_collisions(data_files: &[DataFile]) -> Vec<String> {
    // keyed by canonical JSON so `1` and `"1"` stay distinct
    let mut index: BTreeMap<String, (String, BTreeSet<&str>)> = BTreeMap::new();

    for file in data_files {
        let records = match serde_json::from_slice::<Value>(&file.content) {
            Ok(Value::Array(records)) => records,
            Ok(_) => continue,
            Err(e) => {
                debug!(file = %file.name, error = %e, "skipping unparseable data file");
                continue;
            }
        };
        for record in &records {
            let Some(id) = record.as_object().and_then(|o| o.get("id")) else {
                continue;
            };
            index
                .entry(id.to_string())
                .or_insert_with(|| (display_id(id), BTreeSet::new()))
                .1
                .insert(file.name.as_str());
        }
    }

    index
        .into_values()
        .filter(|(_, files)| files.len() > 1)
        .map(|(id, files)| {
            format!(
                "ID '{}' in: {}",
                id,
                files.into_iter().collect::<Vec<_>>().join(", ")
            )
        })
        .collect()
}

/// Strings render bare; every other JSON value renders as JSON.
pub fn display_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, path: &str) -> ComponentArtifact {
        ComponentArtifact {
            name: name.to_string(),
            category: None,
            relative_path: path.to_string(),
            source: String::new(),
        }
    }

    fn data(name: &str, content: &str) -> DataFile {
        DataFile {
            name: name.to_string(),
            relative_path: format!("src/lib/data/mock/{name}"),
            content: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_component_collision_names_all_files() {
        let components = vec![
            component("Button", "src/lib/components/ui/Button.svelte"),
            component("Header", "src/lib/components/layout/Header.svelte"),
            component("Button", "src/lib/components/forms/Button.svelte"),
            component("Button", "src/lib/components/Button.svelte"),
        ];
        let collisions = component_collisions(&components);
        assert_eq!(
            collisions,
            vec![
                "Button: src/lib/components/ui/Button.svelte, src/lib/components/forms/Button.svelte, src/lib/components/Button.svelte"
            ]
        );
    }

    #[test]
    fn test_unique_components_no_collisions() {
        let components = vec![
            component("A", "a/A.svelte"),
            component("B", "b/B.svelte"),
        ];
        assert!(component_collisions(&components).is_empty());
    }

    #[test]
    fn test_interface_collisions_reported_once() {
        let types = TypesFile::from_content(
            "index.ts",
            "export interface Order { p: Product }\nexport interface Product {}\nexport interface Product {}\nexport interface Product {}\n".to_string(),
        );
        assert_eq!(interface_collisions(&types), vec!["Product"]);
    }

    #[test]
    fn test_record_id_collision_message() {
        let files = vec![
            data("file_a.json", r#"[{"id": "p1"}, {"id": "p2"}]"#),
            data("file_b.json", r#"[{"id": "p1"}]"#),
        ];
        assert_eq!(
            record_id_collisions(&files),
            vec!["ID 'p1' in: file_a.json, file_b.json"]
        );
    }

    #[test]
    fn test_numeric_and_string_ids_distinct() {
        let files = vec![
            data("a.json", r#"[{"id": 1}]"#),
            data("b.json", r#"[{"id": "1"}]"#),
        ];
        assert!(record_id_collisions(&files).is_empty());
    }

    #[test]
    fn test_same_file_repeat_is_not_cross_file_collision() {
        let files = vec![data("a.json", r#"[{"id": "x"}, {"id": "x"}]"#)];
        assert!(record_id_collisions(&files).is_empty());
    }

    #[test]
    fn test_malformed_and_non_list_files_skipped() {
        let files = vec![
            data("bad.json", "{ not json"),
            data("obj.json", r#"{"id": "p1"}"#),
            data("ok.json", r#"[{"id": "p1"}]"#),
        ];
        assert!(record_id_collisions(&files).is_empty());
    }

    #[test]
    fn test_report_total() {
        let report = DuplicationReport {
            components: vec!["A: x, y".into()],
            interfaces: vec!["Product".into(), "Order".into()],
            mock_files: vec![],
        };
        assert_eq!(report.total(), 3);
        assert!(!report.is_empty());
    }
}
