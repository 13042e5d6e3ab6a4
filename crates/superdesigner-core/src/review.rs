//! Deterministic design review document.
//!
//! Everything here is derived from the PRD with regex extraction; nothing
//! calls out to a model. The only varying byte range in the output is the
//! generation date.

use crate::artifact::ArtifactSet;
use crate::markdown::{extract_bullets, extract_headings, extract_section};
use crate::screens::infer_screens;
use chrono::NaiveDate;
use std::fmt;

/// Goals beyond this many are left out of the scaffold prompt.
pub const MAX_PROMPT_GOALS: usize = 5;

// ---------------------------------------------------------------------------
// PrdOutline
// ---------------------------------------------------------------------------

/// The parts of a PRD that both the review and the comment list are built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrdOutline {
    pub headings: Vec<String>,
    pub happy_path: Vec<String>,
    pub edge_cases: Vec<String>,
    pub screens: Vec<String>,
    pub overview: String,
    pub problem: String,
    pub goals: Vec<String>,
}

impl PrdOutline {
    pub fn from_prd(prd: &str) -> Self {
        let headings = extract_headings(prd);
        let screens = infer_screens(&headings);
        let outline = Self {
            happy_path: extract_bullets(prd, "happy path"),
            edge_cases: extract_bullets(prd, "edge case"),
            overview: extract_section(prd, "overview"),
            problem: extract_section(prd, "problem"),
            goals: extract_bullets(prd, "goals"),
            headings,
            screens,
        };
        tracing::debug!(
            headings = outline.headings.len(),
            happy_path = outline.happy_path.len(),
            edge_cases = outline.edge_cases.len(),
            screens = outline.screens.len(),
            "parsed prd outline"
        );
        outline
    }

    pub fn has_happy_path(&self) -> bool {
        !self.happy_path.is_empty()
    }

    pub fn has_edge_cases(&self) -> bool {
        !self.edge_cases.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ReviewSection
// ---------------------------------------------------------------------------

/// The six numbered sections of a review, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewSection {
    IntendedFlow,
    ExpectedScreens,
    StatesChecklist,
    GapsAndRisks,
    Suggestions,
    ScaffoldPrompt,
}

impl ReviewSection {
    pub fn all() -> &'static [ReviewSection] {
        &[
            ReviewSection::IntendedFlow,
            ReviewSection::ExpectedScreens,
            ReviewSection::StatesChecklist,
            ReviewSection::GapsAndRisks,
            ReviewSection::Suggestions,
            ReviewSection::ScaffoldPrompt,
        ]
    }

    pub fn number(self) -> usize {
        match self {
            ReviewSection::IntendedFlow => 1,
            ReviewSection::ExpectedScreens => 2,
            ReviewSection::StatesChecklist => 3,
            ReviewSection::GapsAndRisks => 4,
            ReviewSection::Suggestions => 5,
            ReviewSection::ScaffoldPrompt => 6,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReviewSection::IntendedFlow => "Intended Flow (from PRD)",
            ReviewSection::ExpectedScreens => "Expected Screens (inferred)",
            ReviewSection::StatesChecklist => "States Checklist",
            ReviewSection::GapsAndRisks => "Gaps & Risks",
            ReviewSection::Suggestions => "Suggestions",
            ReviewSection::ScaffoldPrompt => "Figma Make Prompt",
        }
    }
}

impl fmt::Display for ReviewSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "## {}. {}", self.number(), self.title())
    }
}

const STATES_CHECKLIST: [&str; 5] = [
    "- [ ] **Happy path** — The ideal user journey",
    "- [ ] **Empty** — No data, first-time user, or cleared state",
    "- [ ] **Loading** — Waiting for data or action completion",
    "- [ ] **Error** — Something went wrong (network, validation, permissions)",
    "- [ ] **Recovery** — How the user gets back on track",
];

const COMMON_GAPS: [&str; 5] = [
    "Offline behavior",
    "Permission denied states",
    "Session timeout handling",
    "Rate limiting / throttling",
    "Accessibility considerations",
];

const GENERIC_SUGGESTIONS: [&str; 3] = [
    "Review each edge case against your Figma screens.",
    "Ensure all states in the checklist are designed.",
    "Consider adding loading skeletons for better perceived performance.",
];

const PROMPT_STATES: [&str; 4] = [
    "Default (happy path)",
    "Empty state",
    "Loading state",
    "Error state",
];

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}\n", i + 1))
        .collect()
}

fn heading(out: &mut String, section: ReviewSection) {
    out.push_str(&format!("{section}\n\n"));
}

fn intended_flow(out: &mut String, outline: &PrdOutline) {
    if outline.has_happy_path() {
        out.push_str(&numbered(&outline.happy_path));
    } else {
        out.push_str(
            "*No explicit \"Happy path\" section found in PRD. Please document the main user journey.*\n",
        );
    }
}

fn expected_screens(out: &mut String, outline: &PrdOutline) {
    for screen in &outline.screens {
        out.push_str(&format!("- [ ] {screen}\n"));
    }
}

fn states_checklist(out: &mut String) {
    out.push_str("Every screen should account for these states:\n\n");
    for item in STATES_CHECKLIST {
        out.push_str(item);
        out.push('\n');
    }
}

fn gaps_and_risks(out: &mut String, outline: &PrdOutline) {
    if outline.has_edge_cases() {
        out.push_str("### Edge cases identified in PRD:\n\n");
        for edge in &outline.edge_cases {
            out.push_str(&format!("- ⚠️ {edge}\n"));
        }
        out.push('\n');
    } else {
        out.push_str("*No explicit \"Edge cases\" section found in PRD.*\n\n");
    }

    out.push_str("### Common gaps to check:\n\n");
    for gap in COMMON_GAPS {
        out.push_str(&format!("- [ ] {gap}\n"));
    }
}

fn suggestions(out: &mut String, outline: &PrdOutline) {
    out.push_str("Based on the PRD analysis:\n\n");
    if !outline.has_happy_path() {
        out.push_str(
            "1. **Document the happy path** — Add a \"Happy path\" section to your PRD with numbered steps.\n",
        );
    }
    if !outline.has_edge_cases() {
        out.push_str("1. **Identify edge cases** — Add an \"Edge cases\" section to your PRD.\n");
    }
    if outline.has_happy_path() && outline.has_edge_cases() {
        for (i, s) in GENERIC_SUGGESTIONS.iter().enumerate() {
            out.push_str(&format!("{}. {s}\n", i + 1));
        }
    }
}

fn scaffold_prompt(out: &mut String, outline: &PrdOutline, project_name: &str) {
    out.push_str("Use this prompt with Figma's AI features to scaffold your prototype:\n\n");
    out.push_str("```\n");
    out.push_str(&format!(
        "Create a prototype skeleton for \"{project_name}\".\n\n"
    ));

    if !outline.overview.is_empty() {
        out.push_str(&format!("## Context\n{}\n\n", outline.overview));
    }
    if !outline.problem.is_empty() {
        out.push_str(&format!("## Problem\n{}\n\n", outline.problem));
    }
    if !outline.goals.is_empty() {
        out.push_str("## Goals\n");
        for goal in outline.goals.iter().take(MAX_PROMPT_GOALS) {
            out.push_str(&format!("- {goal}\n"));
        }
        out.push('\n');
    }

    if outline.has_happy_path() {
        out.push_str("## User Flow\n");
        out.push_str(&numbered(&outline.happy_path));
    } else {
        out.push_str(&format!("## Screens Needed\n{}\n", outline.screens.join(", ")));
    }

    out.push_str(&format!(
        "\n## Required Frames\n- {}\n\n",
        outline.screens.join("\n- ")
    ));
    out.push_str("## States (for each screen)\n");
    for state in PROMPT_STATES {
        out.push_str(&format!("- {state}\n"));
    }
    out.push_str("\nFocus on flow and structure, not visual polish.\n```\n");
}

/// Render the review for a fixed date.
pub fn render_review(artifacts: &ArtifactSet, project_name: &str, date: NaiveDate) -> String {
    let outline = PrdOutline::from_prd(&artifacts.prd);
    let mut out = format!(
        "# Design Review: {project_name}\n\n*Generated on {}*\n\n---\n\n",
        date.format("%Y-%m-%d")
    );

    for (i, &section) in ReviewSection::all().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        heading(&mut out, section);
        match section {
            ReviewSection::IntendedFlow => intended_flow(&mut out, &outline),
            ReviewSection::ExpectedScreens => expected_screens(&mut out, &outline),
            ReviewSection::StatesChecklist => states_checklist(&mut out),
            ReviewSection::GapsAndRisks => gaps_and_risks(&mut out, &outline),
            ReviewSection::Suggestions => suggestions(&mut out, &outline),
            ReviewSection::ScaffoldPrompt => scaffold_prompt(&mut out, &outline, project_name),
        }
    }

    out.push_str("\n---\n\n*Review generated by Superdesigner v0.1*\n");
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
