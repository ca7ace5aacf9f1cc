//! Read-only enumeration of the generated artifacts a gate inspects.
//!
//! One [`ProjectScan`] is built per run and shared by every check, so all
//! checks see the same file set. Per-file read failures are collected on the
//! scan instead of aborting it.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LayoutConfig;
use crate::error::{GateError, Result};

/// A generated UI component file.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentArtifact {
    /// Base name (file stem); the identity used for duplicate detection.
    pub name: String,

    /// First directory below the component root (`layout`, `ui`, ...), if any.
    pub category: Option<String>,

    /// Path relative to the project root.
    pub relative_path: String,

    #[serde(skip)]
    pub source: String,
}

impl ComponentArtifact {
    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }
}

/// One `interface <Name>` declaration in the central types file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDefinition {
    pub name: String,
    pub exported: bool,
    /// 1-based line of the declaration.
    pub line: usize,
}

/// The central type-definitions file.
#[derive(Debug, Clone, Serialize)]
pub struct TypesFile {
    pub relative_path: String,
    /// Declarations in source order, duplicates included.
    pub definitions: Vec<TypeDefinition>,
    #[serde(skip)]
    pub content: String,
}

impl TypesFile {
    pub fn from_content(relative_path: impl Into<String>, content: String) -> Self {
        let definitions = extract_type_definitions(&content);
        Self {
            relative_path: relative_path.into(),
            definitions,
            content,
        }
    }

    /// Exported declarations in source order (duplicates included).
    pub fn exported(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.iter().filter(|d| d.exported)
    }

    /// Distinct exported names, first-declaration order.
    pub fn exported_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for def in self.exported() {
            if !names.contains(&def.name) {
                names.push(def.name.clone());
            }
        }
        names
    }
}

/// A structured data file holding (ideally) a list of records.
#[derive(Debug, Clone, Serialize)]
pub struct DataFile {
    /// File name only, e.g. `products.json`.
    pub name: String,
    pub relative_path: String,
    /// Raw bytes; encoding problems are a parse failure, reported by the
    /// consumer with the file name and position.
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// A file that could not be read (I/O or encoding failure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadableFile {
    pub relative_path: String,
    pub reason: String,
}

/// Snapshot of all artifacts relevant to validation.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectScan {
    pub root: PathBuf,
    pub components: Vec<ComponentArtifact>,
    pub types_file: Option<TypesFile>,
    pub data_files: Vec<DataFile>,
    /// Sum of line counts across all generated source files.
    pub source_lines: usize,
    pub unreadable: Vec<UnreadableFile>,
}

impl ProjectScan {
    /// Distinct component names, scan order.
    pub fn component_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for c in &self.components {
            if !names.contains(&c.name) {
                names.push(c.name.clone());
            }
        }
        names
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.components.iter().any(|c| c.name == name)
    }

    pub fn data_file_names(&self) -> Vec<String> {
        self.data_files.iter().map(|f| f.name.clone()).collect()
    }

    pub fn exported_type_names(&self) -> Vec<String> {
        self.types_file
            .as_ref()
            .map(TypesFile::exported_names)
            .unwrap_or_default()
    }
}

/// Walks a project root according to a [`LayoutConfig`].
pub struct ArtifactScanner<'a> {
    root: &'a Path,
    layout: &'a LayoutConfig,
}

impl<'a> ArtifactScanner<'a> {
    pub fn new(root: &'a Path, layout: &'a LayoutConfig) -> Self {
        Self { root, layout }
    }

    /// Fail fast when the project root itself is unusable.
    pub fn ensure_root(root: &Path) -> Result<()> {
        if !root.exists() {
            return Err(GateError::ProjectRootMissing(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(GateError::ProjectRootNotDirectory(root.to_path_buf()));
        }
        Ok(())
    }

    pub fn scan(&self) -> Result<ProjectScan> {
        Self::ensure_root(self.root)?;

        let mut unreadable = Vec::new();
        let components = self.scan_components(&mut unreadable);
        let types_file = self.scan_types_file(&mut unreadable);
        let data_files = self.scan_data_files(&mut unreadable);
        let source_lines = self.count_source_lines(&mut unreadable);

        debug!(
            components = components.len(),
            data_files = data_files.len(),
            source_lines = source_lines,
            unreadable = unreadable.len(),
            "artifact scan complete"
        );

        Ok(ProjectScan {
            root: self.root.to_path_buf(),
            components,
            types_file,
            data_files,
            source_lines,
            unreadable,
        })
    }

    fn scan_components(&self, unreadable: &mut Vec<UnreadableFile>) -> Vec<ComponentArtifact> {
        let base = self.root.join(&self.layout.components_dir);
        let mut components = Vec::new();

        for path in self.walk(&base, usize::MAX, &[self.layout.component_extension.as_str()], unreadable) {
            let Some(source) = self.read(&path, unreadable) else {
                continue;
            };
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let category = path
                .strip_prefix(&base)
                .ok()
                .and_then(|rel| {
                    let mut parts = rel.components();
                    let first = parts.next()?;
                    // a file directly under the root has no category
                    parts.next()?;
                    Some(first.as_os_str().to_string_lossy().into_owned())
                });
            components.push(ComponentArtifact {
                name,
                category,
                relative_path: self.relative(&path),
                source,
            });
        }
        components
    }

    fn scan_types_file(&self, unreadable: &mut Vec<UnreadableFile>) -> Option<TypesFile> {
        let path = self.root.join(&self.layout.types_file);
        if !path.is_file() {
            return None;
        }
        let content = self.read(&path, unreadable)?;
        Some(TypesFile::from_content(self.relative(&path), content))
    }

    fn scan_data_files(&self, unreadable: &mut Vec<UnreadableFile>) -> Vec<DataFile> {
        let base = self.root.join(&self.layout.data_dir);
        let mut files = Vec::new();
        for path in self.walk(&base, 1, &[self.layout.data_extension.as_str()], unreadable) {
            let content = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.mark_unreadable(&path, e, unreadable);
                    continue;
                }
            };
            files.push(DataFile {
                name: path
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                relative_path: self.relative(&path),
                content,
            });
        }
        files
    }

    fn count_source_lines(&self, unreadable: &mut Vec<UnreadableFile>) -> usize {
        let base = self.root.join(&self.layout.source_dir);
        let extensions: Vec<&str> = self.layout.source_extensions.iter().map(String::as_str).collect();
        self.walk(&base, usize::MAX, &extensions, unreadable)
            .iter()
            .filter_map(|path| self.read(path, unreadable))
            .map(|content| content.lines().count())
            .sum()
    }

    /// Regular files under `dir` (up to `max_depth`) with one of `extensions`,
    /// in deterministic name order. Symlinks are followed, so a linked
    /// artifact counts like a copied one; link cycles land in `unreadable`.
    /// A missing `dir` yields nothing.
    fn walk(
        &self,
        dir: &Path,
        max_depth: usize,
        extensions: &[&str],
        unreadable: &mut Vec<UnreadableFile>,
    ) -> Vec<PathBuf> {
        if !dir.is_dir() {
            return Vec::new();
        }
        let mut out = Vec::new();
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    unreadable.push(UnreadableFile {
                        relative_path: e
                            .path()
                            .map(|p| self.relative(p))
                            .unwrap_or_else(|| self.relative(dir)),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| extensions.contains(&ext));
            if matches {
                out.push(entry.into_path());
            }
        }
        out
    }

    fn read(&self, path: &Path, unreadable: &mut Vec<UnreadableFile>) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) => {
                self.mark_unreadable(path, e, unreadable);
                None
            }
        }
    }

    fn mark_unreadable(
        &self,
        path: &Path,
        err: std::io::Error,
        unreadable: &mut Vec<UnreadableFile>,
    ) {
        let relative_path = self.relative(path);
        // the same file can be reached by more than one walk
        if !unreadable.iter().any(|u| u.relative_path == relative_path) {
            unreadable.push(UnreadableFile {
                relative_path,
                reason: err.to_string(),
            });
        }
    }

    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn interface_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b(export\s+)?interface\s+(\w+)").expect("interface pattern is valid")
    })
}

/// Positional scan for `interface` declarations. This is a textual
/// approximation: declarations inside comments or strings are counted too.
pub fn extract_type_definitions(content: &str) -> Vec<TypeDefinition> {
    interface_pattern()
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(2)?.as_str().to_string();
            let line = content[..whole.start()].matches('\n').count() + 1;
            Some(TypeDefinition {
                name,
                exported: caps.get(1).is_some(),
                line,
            })
        })
        .collect()
}
