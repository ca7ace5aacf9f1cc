//! Post-flight static checks: duplication and structural linting over one
//! shared scan. The external type check lives in `migration-gate-ci`.

use crate::config::GateConfig;
use crate::duplication::detect_duplicates;
use crate::finding::Finding;
use crate::lint::StructuralLinter;
use crate::obs::emit_check_completed;
use crate::preflight::unreadable_findings;
use crate::run::ValidationRun;
use crate::scanner::ProjectScan;

/// Run every in-process post-flight check and fold the results into `run`.
///
/// Each check is independent; none can abort the others.
pub fn run_static_checks(scan: &ProjectScan, config: &GateConfig, run: &mut ValidationRun) {
    run.extend(unreadable_findings(scan));

    run.duplicates = detect_duplicates(
        &scan.components,
        scan.types_file.as_ref(),
        &scan.data_files,
    );
    emit_check_completed("duplication", 0, run.duplicates.total());

    let findings = StructuralLinter::new(config).lint(scan);
    let (errors, warnings) = count(&findings);
    emit_check_completed("structure", errors, warnings);
    run.extend(findings);
}

fn count(findings: &[Finding]) -> (usize, usize) {
    let errors = findings.iter().filter(|f| f.is_blocking()).count();
    (errors, findings.len() - errors)
}
