//! Artifact templates compiled into the binary.

use crate::artifact::ArtifactKind;

/// PRD skeleton. Headings are phrased so the review extractor finds
/// "Happy path", "Edge cases", "Overview", "Problem" and "Goals".
pub const PRD_TEMPLATE: &str = r#"# Product Requirements Document

## Overview

## Problem statement

## Goals

## User segments / cohorts

## Success metrics

## Entry points / surfaces

## Happy path (step-by-step)

## Key screens (expected)

## States checklist (per key screen)
- Happy path
- Empty
- Loading
- Error
- Recovery
- Expired (if time-bound)

## Rewards / incentives (if applicable)

## Edge cases & unhappy paths

## Out of scope

## Dependencies / integrations

## Open questions
"#;

pub const RESEARCH_TEMPLATE: &str = r#"# Research Notes

## Study summary (who/when/how many)

## Key findings (bullets)

## Quotes (optional, max 5)

## Behavioral insights

## Pain points / frictions

## Terminology & comprehension risks

## Design implications

## Open questions
"#;

pub const FIGMA_TEMPLATE: &str = r#"# Figma

Paste the link to the main design file or frame below. Copy it from
Figma with "Copy link to selection" so the URL carries a node-id.

Link:

Optional overrides when the link is not available:

FileKey: <file key>
NodeId: <node id>
"#;

pub const ANALYTICS_TEMPLATE: &str = r#"# Analytics Requirements

## Key events

## Funnel (step-by-step)

## Properties per event

## Success dashboards

## Open questions
"#;

pub fn body(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Prd => PRD_TEMPLATE,
        ArtifactKind::Research => RESEARCH_TEMPLATE,
        ArtifactKind::Figma => FIGMA_TEMPLATE,
        ArtifactKind::Analytics => ANALYTICS_TEMPLATE,
    }
}

/// Metadata block placed above every template in a new project.
pub fn header(project_name: &str, created: &str) -> String {
    format!("---\nProject: {project_name}\nCreated: {created}\n---\n\n")
}

/// Full initial content of an artifact file.
pub fn render(kind: ArtifactKind, project_name: &str, created: &str) -> String {
    let mut out = header(project_name, created);
    out.push_str(body(kind));
    out
}
