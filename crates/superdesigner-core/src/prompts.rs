//! Agent hand-off files for a review: a short prompt that points at the
//! context files, and a size-bounded digest of the artifacts.

use crate::artifact::{ArtifactKind, ArtifactSet};
use crate::{io, paths};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;

pub const PRD_DIGEST_CHARS: usize = 3000;
pub const RESEARCH_DIGEST_CHARS: usize = 2000;
pub const ANALYTICS_DIGEST_CHARS: usize = 1000;

/// Comments the agent may write, more than the deterministic generator.
pub const AGENT_COMMENT_LIMIT: usize = 10;

pub fn render_review_prompt(project_name: &str, slug: &str) -> String {
    let context: String = ArtifactKind::all()
        .iter()
        .map(|k| format!("- projects/{slug}/context/{}\n", k.filename()))
        .collect();

    format!(
        r#"# Review: {project_name}

Read the context files and generate design review insights.

## Context (read these files)

{context}
## Figma Analysis (REQUIRED)

**You MUST use Figma MCP tools to analyze the design:**

1. Read `projects/{slug}/context/figma.md` to get Figma URLs and node IDs
2. For each Figma URL, use `mcp_Figma_get_metadata` to get the nested frame structure
3. Use `mcp_Figma_get_design_context` on key screens to understand the design
4. Extract specific nodeIds for nested screens (not just parent frames)
5. Use these specific nodeIds when generating design comments

This ensures comments are pinned to the correct screens, not just parent frames.

## Output (write to these files)

1. **projects/{slug}/insights/{review}** — Keep the six numbered sections of the existing file:
   Intended Flow, Expected Screens, States Checklist, Gaps & Risks, Suggestions, Figma Make Prompt.

2. **projects/{slug}/insights/{comments}** — Follow the EXACT block format of the existing file:
   `## Comment N`, `Target:` (page, frame, nodeId), `Type:`, `Message:`, `Why:`, separated by `---`.

   Limit to {limit} comments. Each MUST have: page, frame, nodeId, Type, Message, Why.
   Use nodeIds from nested screens, not parent frames.

## Rules

1. Review intent, not pixels
2. Write only to the insights folder
3. Check: states, edge cases, analytics assumptions, PRD/design alignment
4. Tone: direct, question-based, concise
5. Use Figma MCP to get accurate screen-level nodeIds
"#,
        review = paths::DESIGN_REVIEW_FILE,
        comments = paths::COMMENTS_PREVIEW_FILE,
        limit = AGENT_COMMENT_LIMIT,
    )
}

fn digest(content: &str, limit: Option<usize>, filename: &str) -> String {
    if content.is_empty() {
        return format!("*No {filename} found*");
    }
    match limit {
        Some(n) => content.chars().take(n).collect(),
        None => content.to_string(),
    }
}

pub fn render_review_context(
    artifacts: &ArtifactSet,
    project_name: &str,
    slug: &str,
    generated: DateTime<Utc>,
) -> String {
    format!(
        "# Review Context: {project_name}

Generated: {}
Slug: {slug}

---

## PRD Summary

{}

---

## Research Summary

{}

---

## Figma

{}

---

## Analytics

{}
",
        generated.to_rfc3339_opts(SecondsFormat::Millis, true),
        digest(&artifacts.prd, Some(PRD_DIGEST_CHARS), ArtifactKind::Prd.filename()),
        digest(
            &artifacts.research,
            Some(RESEARCH_DIGEST_CHARS),
            ArtifactKind::Research.filename()
        ),
        digest(&artifacts.figma, None, ArtifactKind::Figma.filename()),
        digest(
            &artifacts.analytics,
            Some(ANALYTICS_DIGEST_CHARS),
            ArtifactKind::Analytics.filename()
        ),
    )
}

/// Write `_review_prompt.md` and `_review_context.md` under `insights/prompts/`.
pub fn write_review_prompts(
    root: &Path,
    slug: &str,
    project_name: &str,
    artifacts: &ArtifactSet,
    now: DateTime<Utc>,
) -> crate::Result<()> {
    io::atomic_write(
        &paths::review_prompt_path(root, slug),
        render_review_prompt(project_name, slug).as_bytes(),
    )?;
    io::atomic_write(
        &paths::review_context_path(root, slug),
        render_review_context(artifacts, project_name, slug, now).as_bytes(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-14T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn prompt_lists_context_files() {
        let prompt = render_review_prompt("Botim Quest", "botim-quest");
        assert!(prompt.starts_with("# Review: Botim Quest\n"));
        assert!(prompt.contains(
            "- projects/botim-quest/context/prd.md\n- projects/botim-quest/context/research.md\n\
             - projects/botim-quest/context/figma.md\n- projects/botim-quest/context/analytics.md\n\n## Figma Analysis"
        ));
        assert!(prompt.contains("projects/botim-quest/insights/design-comments.preview.md"));
        assert!(prompt.contains("Limit to 10 comments."));
    }

    #[test]
    fn context_truncates_and_marks_missing() {
        let set = ArtifactSet {
            prd: "p".repeat(PRD_DIGEST_CHARS + 50),
            research: String::new(),
            figma: "f".repeat(5000),
            analytics: "a".repeat(10),
        };
        let doc = render_review_context(&set, "Quest", "quest", now());
        assert!(doc.starts_with("# Review Context: Quest\n\nGenerated: 2026-03-14T10:00:00.000Z\nSlug: quest\n"));
        assert!(doc.contains(&format!("## PRD Summary\n\n{}\n\n---", "p".repeat(PRD_DIGEST_CHARS))));
        assert!(doc.contains("## Research Summary\n\n*No research.md found*\n"));
        assert!(doc.contains(&"f".repeat(5000)));
        assert!(doc.ends_with("## Analytics\n\naaaaaaaaaa\n"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let set = ArtifactSet {
            analytics: "é".repeat(ANALYTICS_DIGEST_CHARS + 1),
            ..Default::default()
        };
        let doc = render_review_context(&set, "x", "x", now());
        assert!(doc.contains(&"é".repeat(ANALYTICS_DIGEST_CHARS)));
        assert!(!doc.contains(&"é".repeat(ANALYTICS_DIGEST_CHARS + 1)));
    }

    #[test]
    fn writes_both_files() {
        let dir = TempDir::new().unwrap();
        write_review_prompts(dir.path(), "quest", "Quest", &ArtifactSet::default(), now()).unwrap();
        assert!(paths::review_prompt_path(dir.path(), "quest").is_file());
        let ctx = std::fs::read_to_string(paths::review_context_path(dir.path(), "quest")).unwrap();
        assert!(ctx.contains("*No prd.md found*"));
    }
}
