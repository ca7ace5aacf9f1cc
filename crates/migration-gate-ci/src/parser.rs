//! Extraction of counts and file paths from type-check output.
//!
//! No structured protocol is assumed; only the textual shapes
//! `N error(s)`, `N warning(s)` and `src/<path>.<svelte|ts|js>:`.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Parsed type-check output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainResult {
    pub errors: usize,
    pub warnings: usize,
    /// Distinct implicated files, sorted.
    pub files: Vec<String>,
}

struct Patterns {
    errors: Regex,
    warnings: Regex,
    files: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        errors: Regex::new(r"(\d+) errors?").expect("error count pattern is valid"),
        warnings: Regex::new(r"(\d+) warnings?").expect("warning count pattern is valid"),
        files: Regex::new(r"(src/[^\s:]+\.(?:svelte|ts|js)):").expect("file pattern is valid"),
    })
}

fn first_count(pattern: &Regex, output: &str) -> usize {
    pattern
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

pub fn parse_check_output(output: &str) -> ToolchainResult {
    let p = patterns();
    let files: BTreeSet<String> = p
        .files
        .captures_iter(output)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();

    ToolchainResult {
        errors: first_count(&p.errors, output),
        warnings: first_count(&p.warnings, output),
        files: files.into_iter().collect(),
    }
}
