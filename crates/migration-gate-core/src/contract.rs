//! Instruction contracts: the clauses an instruction must contain before it
//! is handed to a given agent type.
//!
//! Contracts are static tables keyed by [`AgentType`]. Each clause names a
//! [`Check`], the severity when it is missing, and a message template.
//! Semantic markers map to several accepted literal forms (English and
//! Russian), checked with "any form present" semantics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::GateConfig;
use crate::finding::{Finding, FindingCategory, Severity};
use crate::scanner::ProjectScan;

/// Automated content-generation roles in the migration pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AgentType {
    #[serde(rename = "static-to-svelte-analyzer")]
    Analyzer,
    #[serde(rename = "mock-data-generator")]
    MockDataGenerator,
    #[serde(rename = "ui-components-builder")]
    UiComponentsBuilder,
    #[serde(rename = "page-data-provider-builder")]
    PageDataProviderBuilder,
    #[serde(rename = "typescript-svelte-error-fixer")]
    ErrorFixer,
}

impl AgentType {
    pub const ALL: [AgentType; 5] = [
        AgentType::Analyzer,
        AgentType::MockDataGenerator,
        AgentType::UiComponentsBuilder,
        AgentType::PageDataProviderBuilder,
        AgentType::ErrorFixer,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            AgentType::Analyzer => "static-to-svelte-analyzer",
            AgentType::MockDataGenerator => "mock-data-generator",
            AgentType::UiComponentsBuilder => "ui-components-builder",
            AgentType::PageDataProviderBuilder => "page-data-provider-builder",
            AgentType::ErrorFixer => "typescript-svelte-error-fixer",
        }
    }

    /// Comma-separated list of accepted identifiers, for usage messages.
    pub fn supported() -> String {
        Self::ALL.iter().map(|a| a.id()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Lookup failure for an agent identifier. Contracts fail closed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown agent type: {0}")]
pub struct UnknownAgentType(pub String);

impl FromStr for AgentType {
    type Err = UnknownAgentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| UnknownAgentType(s.to_string()))
    }
}

/// Semantic markers with fixed surface forms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    ExistingContext,
    DoNotRecreate,
    LineLimit,
    EntryLimit,
    ComponentSizeLimit,
    StaticTyping,
    ReactiveState,
    Accessibility,
    Seo,
}

impl Marker {
    /// Accepted literal forms; any one present satisfies the marker.
    pub fn forms(&self) -> &'static [&'static str] {
        match self {
            Marker::ExistingContext => &["СУЩЕСТВУЮТ", "EXISTING"],
            Marker::DoNotRecreate => &["НЕ создавай", "DO NOT CREATE"],
            Marker::LineLimit => &["<1500", "<2000"],
            Marker::EntryLimit => &["15 записей", "10-15"],
            Marker::ComponentSizeLimit => &["<200 строк", "<200 lines"],
            Marker::StaticTyping => &["TypeScript"],
            Marker::ReactiveState => &["Svelte 5"],
            Marker::Accessibility => &["Accessibility", "A11y"],
            Marker::Seo => &["SEO"],
        }
    }

    pub fn is_present(&self, instruction: &str) -> bool {
        self.forms().iter().any(|form| instruction.contains(form))
    }
}

/// What a clause verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// A static marker must be present.
    Marker(Marker),
    /// Every existing data file name must appear verbatim (one finding each).
    ListsExistingDataFiles,
    /// Every existing component name must appear verbatim (one finding each).
    ListsExistingComponents,
    /// The shared card component must be named, if it exists.
    MentionsSharedCard,
    /// The type-check invocation (and so its output) must be embedded.
    EmbedsTypeCheckOutput,
    /// The central types file must be referenced, if it exports anything.
    ReferencesTypesFile,
}

/// One required clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    pub check: Check,
    pub severity: Severity,
    /// Placeholders: `{agent}`, `{card}`, `{item}`, `{command}`, `{types}`.
    pub message: &'static str,
}

const fn advise(check: Check, message: &'static str) -> Clause {
    Clause {
        check,
        severity: Severity::Warning,
        message,
    }
}

const fn require(check: Check, message: &'static str) -> Clause {
    Clause {
        check,
        severity: Severity::Error,
        message,
    }
}

/// Clauses every instruction must contain, whatever the agent.
pub const COMMON_CLAUSES: &[Clause] = &[
    advise(
        Check::Marker(Marker::ExistingContext),
        "Instruction missing EXISTING context for {agent}",
    ),
    advise(
        Check::Marker(Marker::DoNotRecreate),
        "Instruction missing explicit prohibitions (DO NOT CREATE) for {agent}",
    ),
];

const ANALYZER_CLAUSES: &[Clause] = &[advise(
    Check::Marker(Marker::LineLimit),
    "Analyzer: No line limit specified (recommend <1500)",
)];

const MOCK_DATA_CLAUSES: &[Clause] = &[
    advise(
        Check::Marker(Marker::EntryLimit),
        "Mock generator: No entry limit specified (recommend 10-15)",
    ),
    advise(
        Check::ListsExistingDataFiles,
        "Mock generator: Existing file '{item}' not mentioned in DO NOT CREATE",
    ),
];

const UI_BUILDER_CLAUSES: &[Clause] = &[
    advise(
        Check::Marker(Marker::ComponentSizeLimit),
        "UI builder: No component size limit specified (recommend <200 lines)",
    ),
    advise(
        Check::Marker(Marker::StaticTyping),
        "UI builder: TypeScript best practices not mentioned",
    ),
    advise(
        Check::Marker(Marker::ReactiveState),
        "UI builder: Svelte 5 runes not mentioned",
    ),
    advise(
        Check::Marker(Marker::Accessibility),
        "UI builder: Accessibility requirements not mentioned",
    ),
    advise(
        Check::ListsExistingComponents,
        "UI builder: Existing component '{item}' not mentioned in DO NOT CREATE",
    ),
];

const PAGE_BUILDER_CLAUSES: &[Clause] = &[
    advise(
        Check::MentionsSharedCard,
        "Page builder: Should mention REUSE of {card}",
    ),
    advise(
        Check::Marker(Marker::Seo),
        "Page builder: SEO requirements not mentioned",
    ),
];

const ERROR_FIXER_CLAUSES: &[Clause] = &[
    require(
        Check::EmbedsTypeCheckOutput,
        "Error fixer: Must include {command} output",
    ),
    advise(
        Check::ReferencesTypesFile,
        "Error fixer: Should reference existing types in {types}",
    ),
];

/// The clause table for one agent type.
#[derive(Debug, Clone, Copy)]
pub struct AgentContract {
    pub agent: AgentType,
    pub clauses: &'static [Clause],
}

impl AgentContract {
    pub fn for_agent(agent: AgentType) -> Self {
        let clauses = match agent {
            AgentType::Analyzer => ANALYZER_CLAUSES,
            AgentType::MockDataGenerator => MOCK_DATA_CLAUSES,
            AgentType::UiComponentsBuilder => UI_BUILDER_CLAUSES,
            AgentType::PageDataProviderBuilder => PAGE_BUILDER_CLAUSES,
            AgentType::ErrorFixer => ERROR_FIXER_CLAUSES,
        };
        Self { agent, clauses }
    }

    /// Resolve an identifier to its contract; unknown identifiers fail.
    pub fn lookup(id: &str) -> Result<Self, UnknownAgentType> {
        id.parse().map(Self::for_agent)
    }

    /// Common clauses followed by the agent-specific ones, in order.
    pub fn all_clauses(&self) -> impl Iterator<Item = &'static Clause> {
        COMMON_CLAUSES.iter().chain(self.clauses.iter())
    }
}

/// Existing-artifact facts an instruction is checked against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContractContext {
    pub data_files: Vec<String>,
    pub components: Vec<String>,
    pub exported_types: Vec<String>,
    pub shared_card: String,
    pub shared_card_exists: bool,
    pub type_check_command: String,
    /// Accepted ways of referring to the central types file.
    pub types_file_forms: Vec<String>,
}

impl ContractContext {
    pub fn from_scan(scan: &ProjectScan, config: &GateConfig) -> Self {
        let shared_card = config.contracts.shared_card_component.clone();
        let shared_card_exists = !shared_card.is_empty() && scan.has_component(&shared_card);
        Self {
            data_files: scan.data_file_names(),
            components: scan.component_names(),
            exported_types: scan.exported_type_names(),
            shared_card,
            shared_card_exists,
            type_check_command: config.toolchain.display_command(),
            types_file_forms: types_file_forms(&config.layout.types_file),
        }
    }
}

/// The full configured path plus its last two components (`types/index.ts`).
fn types_file_forms(path: &std::path::Path) -> Vec<String> {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let mut forms = vec![parts.join("/")];
    if parts.len() > 2 {
        forms.push(parts[parts.len() - 2..].join("/"));
    }
    forms
}

/// Result of checking one instruction against its contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionVerdict {
    pub agent: AgentType,
    pub findings: Vec<Finding>,
}

impl InstructionVerdict {
    /// Errors block; warnings only advise.
    pub fn passed(&self) -> bool {
        !self.findings.iter().any(Finding::is_blocking)
    }
}

/// Check an instruction against the contract for `agent`.
pub fn check_instruction(
    contract: &AgentContract,
    instruction: &str,
    ctx: &ContractContext,
) -> InstructionVerdict {
    let mut findings = Vec::new();
    for clause in contract.all_clauses() {
        for item in missing_items(clause.check, instruction, ctx) {
            let message = clause
                .message
                .replace("{agent}", contract.agent.id())
                .replace("{card}", &ctx.shared_card)
                .replace("{command}", &ctx.type_check_command)
                .replace(
                    "{types}",
                    ctx.types_file_forms.last().map(String::as_str).unwrap_or_default(),
                )
                .replace("{item}", &item);
            findings.push(Finding {
                severity: clause.severity,
                category: FindingCategory::Instruction,
                message,
                file: None,
            });
        }
    }
    InstructionVerdict {
        agent: contract.agent,
        findings,
    }
}

/// One entry per violation; empty when the clause is satisfied or does not
/// apply. Single-shot clauses yield an empty item.
fn missing_items(check: Check, instruction: &str, ctx: &ContractContext) -> Vec<String> {
    let single = |ok: bool| if ok { Vec::new() } else { vec![String::new()] };
    match check {
        Check::Marker(marker) => single(marker.is_present(instruction)),
        Check::ListsExistingDataFiles => ctx
            .data_files
            .iter()
            .filter(|name| !instruction.contains(name.as_str()))
            .cloned()
            .collect(),
        Check::ListsExistingComponents => ctx
            .components
            .iter()
            .filter(|name| !instruction.contains(name.as_str()))
            .cloned()
            .collect(),
        Check::MentionsSharedCard => {
            single(!ctx.shared_card_exists || instruction.contains(&ctx.shared_card))
        }
        Check::EmbedsTypeCheckOutput => single(instruction.contains(&ctx.type_check_command)),
        Check::ReferencesTypesFile => single(
            ctx.exported_types.is_empty()
                || ctx
                    .types_file_forms
                    .iter()
                    .any(|form| instruction.contains(form.as_str())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ContractContext {
        ContractContext {
            data_files: vec!["products.json".to_string()],
            components: vec!["Header".to_string(), "ProductCard".to_string()],
            exported_types: vec!["Product".to_string()],
            shared_card: "ProductCard".to_string(),
            shared_card_exists: true,
            type_check_command: "npm run check".to_string(),
            types_file_forms: types_file_forms(std::path::Path::new("src/lib/types/index.ts")),
        }
    }

    fn check(agent: AgentType, instruction: &str) -> InstructionVerdict {
        check_instruction(&AgentContract::for_agent(agent), instruction, &ctx())
    }

    #[test]
    fn test_agent_type_round_trips_identifier() {
        for agent in AgentType::ALL {
            assert_eq!(agent.id().parse::<AgentType>(), Ok(agent));
        }
        assert_eq!(
            "code-writer".parse::<AgentType>(),
            Err(UnknownAgentType("code-writer".to_string()))
        );
    }

    #[test]
    fn test_lookup_fails_closed() {
        let err = AgentContract::lookup("nope").expect_err("unknown must fail");
        assert_eq!(err.to_string(), "Unknown agent type: nope");
    }

    #[test]
    fn test_marker_accepts_any_form() {
        assert!(Marker::ExistingContext.is_present("These EXISTING files"));
        assert!(Marker::ExistingContext.is_present("Уже СУЩЕСТВУЮТ компоненты"));
        assert!(!Marker::ExistingContext.is_present("nothing here"));
        assert!(Marker::DoNotRecreate.is_present("НЕ создавай Header"));
    }

    #[test]
    fn test_types_file_forms() {
        let forms = types_file_forms(std::path::Path::new("src/lib/types/index.ts"));
        assert_eq!(forms, vec!["src/lib/types/index.ts", "types/index.ts"]);
    }

    #[test]
    fn test_analyzer_line_limit() {
        let verdict = check(AgentType::Analyzer, "EXISTING: x. DO NOT CREATE y.");
        assert!(verdict.passed());
        assert_eq!(verdict.findings.len(), 1);
        assert!(verdict.findings[0].message.contains("No line limit"));

        let verdict = check(AgentType::Analyzer, "EXISTING: x. DO NOT CREATE y. Keep it <2000");
        assert!(verdict.findings.is_empty());
    }

    #[test]
    fn test_mock_generator_missing_file_named() {
        let verdict = check(AgentType::MockDataGenerator, "EXISTING DO NOT CREATE 10-15 entries");
        assert_eq!(verdict.findings.len(), 1);
        assert_eq!(
            verdict.findings[0].message,
            "Mock generator: Existing file 'products.json' not mentioned in DO NOT CREATE"
        );
    }

    #[test]
    fn test_page_builder_card_only_when_it_exists() {
        let instruction = "EXISTING DO NOT CREATE SEO";
        let verdict = check(AgentType::PageDataProviderBuilder, instruction);
        assert_eq!(verdict.findings.len(), 1);
        assert!(verdict.findings[0].message.contains("REUSE of ProductCard"));

        let mut no_card = ctx();
        no_card.shared_card_exists = false;
        let verdict = check_instruction(
            &AgentContract::for_agent(AgentType::PageDataProviderBuilder),
            instruction,
            &no_card,
        );
        assert!(verdict.findings.is_empty());
    }

    #[test]
    fn test_error_fixer_requires_check_output() {
        let verdict = check(AgentType::ErrorFixer, "EXISTING DO NOT CREATE fix types/index.ts");
        assert!(!verdict.passed());
        assert_eq!(verdict.findings.len(), 1);
        assert_eq!(
            verdict.findings[0].message,
            "Error fixer: Must include npm run check output"
        );
    }

    fn messages(agent: AgentType, instruction: &str) -> Vec<String> {
        check(agent, instruction)
            .findings
            .into_iter()
            .map(|f| f.message)
            .collect()
    }

    #[test]
    fn test_every_accepted_form_satisfies_its_clause() {
        const EXISTING: &str = "Instruction missing EXISTING context for static-to-svelte-analyzer";
        const PROHIBIT: &str =
            "Instruction missing explicit prohibitions (DO NOT CREATE) for static-to-svelte-analyzer";
        const LINES: &str = "Analyzer: No line limit specified (recommend <1500)";
        const ENTRIES: &str = "Mock generator: No entry limit specified (recommend 10-15)";
        const SIZE: &str = "UI builder: No component size limit specified (recommend <200 lines)";
        const TYPING: &str = "UI builder: TypeScript best practices not mentioned";
        const RUNES: &str = "UI builder: Svelte 5 runes not mentioned";
        const A11Y: &str = "UI builder: Accessibility requirements not mentioned";
        const SEO: &str = "Page builder: SEO requirements not mentioned";
        const CHECK: &str = "Error fixer: Must include npm run check output";
        const TYPES: &str = "Error fixer: Should reference existing types in types/index.ts";

        let cases: &[(AgentType, &str, &str)] = &[
            (AgentType::Analyzer, "EXISTING", EXISTING),
            (AgentType::Analyzer, "СУЩЕСТВУЮТ", EXISTING),
            (AgentType::Analyzer, "DO NOT CREATE", PROHIBIT),
            (AgentType::Analyzer, "НЕ создавай", PROHIBIT),
            (AgentType::Analyzer, "<1500", LINES),
            (AgentType::Analyzer, "<2000", LINES),
            (AgentType::MockDataGenerator, "15 записей", ENTRIES),
            (AgentType::MockDataGenerator, "10-15", ENTRIES),
            (AgentType::UiComponentsBuilder, "<200 строк", SIZE),
            (AgentType::UiComponentsBuilder, "<200 lines", SIZE),
            (AgentType::UiComponentsBuilder, "TypeScript", TYPING),
            (AgentType::UiComponentsBuilder, "Svelte 5", RUNES),
            (AgentType::UiComponentsBuilder, "Accessibility", A11Y),
            (AgentType::UiComponentsBuilder, "A11y", A11Y),
            (AgentType::PageDataProviderBuilder, "SEO", SEO),
            (AgentType::ErrorFixer, "npm run check", CHECK),
            (AgentType::ErrorFixer, "types/index.ts", TYPES),
            (AgentType::ErrorFixer, "src/lib/types/index.ts", TYPES),
        ];

        for (agent, form, message) in cases {
            let present = messages(*agent, &format!("Migrate the page. {form} Thanks."));
            assert!(
                !present.iter().any(|m| m == message),
                "{agent}: form {form:?} should satisfy {message:?}, got {present:?}"
            );

            let missing = messages(*agent, "Migrate the page. Thanks.");
            assert!(
                missing.iter().any(|m| m == message),
                "{agent}: expected {message:?} without {form:?}, got {missing:?}"
            );
        }
    }

    #[test]
    fn test_prohibition_forms_are_case_sensitive() {
        let found = messages(AgentType::Analyzer, "EXISTING <1500. не создавай, do not create.");
        assert_eq!(
            found,
            vec!["Instruction missing explicit prohibitions (DO NOT CREATE) for static-to-svelte-analyzer"]
        );
    }

    #[test]
    fn test_page_builder_seo_missing_warns() {
        let verdict = check(
            AgentType::PageDataProviderBuilder,
            "EXISTING pages. DO NOT CREATE cards; REUSE ProductCard.",
        );
        assert!(verdict.passed());
        assert_eq!(verdict.findings.len(), 1);
        assert_eq!(
            verdict.findings[0].message,
            "Page builder: SEO requirements not mentioned"
        );
    }

    #[test]
    fn test_error_fixer_types_reference_skipped_without_types() {
        let mut empty = ctx();
        empty.exported_types.clear();
        let verdict = check_instruction(
            &AgentContract::for_agent(AgentType::ErrorFixer),
            "EXISTING DO NOT CREATE\n$ npm run check\n1 error",
            &empty,
        );
        assert!(verdict.passed());
        assert!(verdict.findings.is_empty());
    }
}
