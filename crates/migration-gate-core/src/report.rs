//! Human-readable report rendering.
//!
//! Rendering is pure: it returns a `String` and never decides the verdict.
//! The complete report is produced even for failing runs so operators see
//! every issue in one pass.

use std::collections::BTreeMap;

use crate::finding::{Finding, FindingCategory};
use crate::preflight::PreFlightReport;
use crate::run::ValidationRun;

const RULE: &str = "============================================================";

/// Render the pre-flight report, including the context summary when
/// prerequisites passed.
pub fn render_preflight(report: &PreFlightReport) -> String {
    let mut out = String::new();
    if let Some(context) = &report.context {
        out.push_str(&context.render());
        out.push('\n');
    }
    out.push_str(&banner("PRE-AGENT VALIDATION REPORT"));
    push_findings(
        &mut out,
        &report.run,
        "ERRORS (must fix before proceeding):",
        "WARNINGS (recommended to address):",
    );
    push_footer(&mut out, &report.run);
    out
}

/// Render the post-flight report: duplication, findings, metrics, verdict.
pub fn render_postflight(run: &ValidationRun) -> String {
    let mut out = banner("POST-AGENT VALIDATION REPORT");

    if !run.duplicates.is_empty() {
        out.push_str("CODE DUPLICATION DETECTED:\n");
        for (heading, entries) in run.duplicates.categories() {
            if entries.is_empty() {
                continue;
            }
            out.push_str(&format!("\n   {}:\n", heading));
            for entry in entries {
                out.push_str(&format!("   - {}\n", entry));
            }
        }
        out.push('\n');
    }

    push_findings(&mut out, run, "ERRORS:", "WARNINGS:");

    let m = &run.metrics;
    out.push_str("METRICS:\n");
    out.push_str(&format!("   Components: {}\n", m.components_created));
    out.push_str(&format!("   Types: {}\n", m.types_defined));
    out.push_str(&format!("   Mock files: {}\n", m.mock_files));
    out.push_str(&format!("   Total lines: {}\n", group_thousands(m.total_lines)));
    out.push_str(&format!("   TypeScript errors: {}\n", m.typescript_errors));
    out.push_str(&format!("   Duplication: {} issues\n\n", m.duplication_score));

    push_footer(&mut out, run);
    out
}

fn banner(title: &str) -> String {
    format!("{RULE}\n{title}\n{RULE}\n\n")
}

fn push_findings(out: &mut String, run: &ValidationRun, errors_title: &str, warnings_title: &str) {
    push_section(out, errors_title, &run.errors);
    push_section(out, warnings_title, &run.warnings);
}

/// One section, grouped by category in a stable order.
fn push_section(out: &mut String, title: &str, findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    let mut groups: BTreeMap<FindingCategory, Vec<&Finding>> = BTreeMap::new();
    for f in findings {
        groups.entry(f.category).or_default().push(f);
    }

    out.push_str(title);
    out.push('\n');
    for (category, items) in groups {
        out.push_str(&format!("   [{}]\n", category.label()));
        for f in items {
            out.push_str(&format!("   - {}\n", f.message));
        }
    }
    out.push('\n');
}

fn push_footer(out: &mut String, run: &ValidationRun) {
    if run.is_clean() {
        out.push_str("All checks passed!\n\n");
    }
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "RESULT: {} ({} error(s), {} warning(s))\n",
        if run.passed() { "PASS" } else { "FAIL" },
        run.errors.len(),
        run.warnings.len()
    ));
}

/// `1234567` -> `1,234,567`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
