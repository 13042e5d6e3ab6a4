//! Suggested design comments: generation, the preview document format, and
//! parsing that document back for posting.
//!
//! The preview file is the hand-off point between `review` and `comment`.
//! It may be edited by hand or rewritten by the agent, so the parser accepts
//! any type label and skips blocks without a message.

use crate::artifact::ArtifactSet;
use crate::figma::extract_node_id;
use crate::paths::slugify;
use crate::review::PrdOutline;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Upper bound on comments generated or parsed from one document.
pub const MAX_COMMENTS: usize = 7;

const FRAME_PLACEHOLDER: &str = "(optional)";

// ---------------------------------------------------------------------------
// CommentType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommentType {
    MissingState,
    FlowMismatch,
    ClarifyingQuestion,
    EdgeCase,
    Validation,
    /// A label written by someone other than the generator.
    Other(String),
}

impl CommentType {
    pub fn all() -> &'static [CommentType] {
        &[
            CommentType::MissingState,
            CommentType::FlowMismatch,
            CommentType::ClarifyingQuestion,
            CommentType::EdgeCase,
            CommentType::Validation,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            CommentType::MissingState => "Missing State",
            CommentType::FlowMismatch => "Flow Mismatch",
            CommentType::ClarifyingQuestion => "Clarifying Question",
            CommentType::EdgeCase => "Edge Case",
            CommentType::Validation => "Validation",
            CommentType::Other(label) => label,
        }
    }

    /// Map a display label back to its variant. Never fails.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        CommentType::all()
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(label))
            .cloned()
            .unwrap_or_else(|| CommentType::Other(label.to_string()))
    }
}

impl fmt::Display for CommentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CommentType {
    fn from(s: String) -> Self {
        CommentType::from_label(&s)
    }
}

impl From<CommentType> for String {
    fn from(t: CommentType) -> Self {
        t.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// ReviewComment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: CommentType,
    pub message: String,
    pub why: String,
}

impl ReviewComment {
    fn new(page: impl Into<String>, kind: CommentType, message: String, why: String) -> Self {
        Self {
            page: page.into(),
            frame: None,
            node_id: None,
            kind,
            message,
            why,
        }
    }

    /// `page`, or `page → frame` when a frame is set.
    pub fn target(&self) -> String {
        match &self.frame {
            Some(frame) => format!("{} → {}", self.page, frame),
            None => self.page.clone(),
        }
    }

    pub fn headline(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Suggested comments for a project, most general first, capped at
/// [`MAX_COMMENTS`]. A long edge-case list can push the trailing
/// validation and clarifying-question comments past the cap.
pub fn generate_comments(artifacts: &ArtifactSet) -> Vec<ReviewComment> {
    let outline = PrdOutline::from_prd(&artifacts.prd);
    let node_id = extract_node_id(&artifacts.figma);
    let mut comments = Vec::new();

    comments.push(ReviewComment::new(
        outline.screens.first().map_or("Main Flow", String::as_str),
        CommentType::MissingState,
        "Does this screen handle Empty, Loading, and Error states?\n\
         Consider adding visual representations for each state to ensure the design covers all scenarios."
            .to_string(),
        "States checklist — every screen should account for empty, loading, and error conditions"
            .to_string(),
    ));

    if !outline.has_happy_path() {
        comments.push(ReviewComment::new(
            "Flow Overview",
            CommentType::FlowMismatch,
            "The PRD does not have a documented \"Happy path\" section.\n\
             Without a clear happy path, it's difficult to verify the design covers the intended user journey."
                .to_string(),
            "PRD → \"Happy path\" section missing".to_string(),
        ));
    }

    for edge in &outline.edge_cases {
        comments.push(ReviewComment::new(
            "Relevant Screen",
            CommentType::EdgeCase,
            format!(
                "The PRD mentions this edge case: \"{edge}\"\n\
                 Is this scenario handled in the design? Consider adding a state or recovery flow."
            ),
            format!("PRD → \"Edge cases\" → \"{edge}\""),
        ));
    }

    comments.push(ReviewComment::new(
        "Form / Input Screen",
        CommentType::Validation,
        "What happens when the user enters invalid input?\n\
         Consider showing inline error states with clear messaging on how to fix the issue."
            .to_string(),
        "Common UX pattern — validation feedback improves form completion rates".to_string(),
    ));

    if let Some(last) = outline.happy_path.last() {
        comments.push(ReviewComment::new(
            "Confirmation",
            CommentType::ClarifyingQuestion,
            format!(
                "After the user completes the main action (\"{last}\"), is there a clear confirmation state?\n\
                 Consider whether the user needs explicit feedback before being redirected."
            ),
            "PRD → \"Happy path\" → final step".to_string(),
        ));
    }

    comments.push(ReviewComment::new(
        "Success Screen",
        CommentType::ClarifyingQuestion,
        "How does the user undo or go back if they made a mistake?\n\
         Consider adding a recovery path or edit option."
            .to_string(),
        "Error recovery — users should be able to correct mistakes".to_string(),
    ));

    comments.truncate(MAX_COMMENTS);
    for c in &mut comments {
        c.node_id = node_id.clone();
    }
    comments
}

// ---------------------------------------------------------------------------
// Preview document
// ---------------------------------------------------------------------------

fn render_block(n: usize, c: &ReviewComment) -> String {
    let node_line = c
        .node_id
        .as_deref()
        .map(|id| format!("\n  nodeId: {id}"))
        .unwrap_or_default();
    format!(
        "## Comment {n}\nTarget:\n  page: {}\n  frame: {}{node_line}\n\nType:\n  {}\n\nMessage:\n{}\n\nWhy:\n{}\n\n---\n\n",
        c.page,
        c.frame.as_deref().unwrap_or(FRAME_PLACEHOLDER),
        c.kind,
        c.message,
        c.why,
    )
}

/// Serialize comments into the preview document for a fixed date.
pub fn render_comments(comments: &[ReviewComment], project_name: &str, date: NaiveDate) -> String {
    let mut out = format!(
        "# Design Comments Preview\nProject: {project_name}\nGenerated: {}\n\n---\n\n",
        date.format("%Y-%m-%d")
    );
    for (i, c) in comments.iter().enumerate() {
        out.push_str(&render_block(i + 1, c));
    }
    out.push_str(&format!(
        "*Total: {} comments*\n*Run `superdesigner comment {}` to post to Figma.*\n",
        comments.len(),
        slugify(project_name)
    ));
    out
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

static BLOCK_RE: OnceLock<Regex> = OnceLock::new();
static PAGE_RE: OnceLock<Regex> = OnceLock::new();
static FRAME_RE: OnceLock<Regex> = OnceLock::new();
static NODE_RE: OnceLock<Regex> = OnceLock::new();
static TYPE_RE: OnceLock<Regex> = OnceLock::new();
static MESSAGE_RE: OnceLock<Regex> = OnceLock::new();
static WHY_RE: OnceLock<Regex> = OnceLock::new();

fn capture(re: &Regex, block: &str) -> Option<String> {
    re.captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Message body: everything after `Message:` up to the line holding `Why:`.
fn parse_message(block: &str) -> Option<String> {
    let re = MESSAGE_RE.get_or_init(|| Regex::new(r"(?m)^Message:\s*\n").unwrap());
    let start = re.find(block)?.end();
    // The newline before `Why:` may already have been consumed.
    let tail = &block[start - 1..];
    let end = tail.find("\nWhy:")?;
    Some(block[start..(start - 1 + end).max(start)].trim().to_string())
}

/// Rationale: after `Why:` up to a `---` rule, a `*` footer line, or the end.
fn parse_why(block: &str) -> Option<String> {
    let re = WHY_RE.get_or_init(|| Regex::new(r"(?m)^Why:").unwrap());
    let rest = &block[re.find(block)?.end()..];
    let end = [rest.find("\n---"), rest.find("\n*")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(rest.len());
    Some(rest[..end].trim().to_string())
}

fn parse_block(block: &str) -> Option<ReviewComment> {
    let page = PAGE_RE.get_or_init(|| Regex::new(r"(?m)^\s*page:\s*(.+)$").unwrap());
    let frame = FRAME_RE.get_or_init(|| Regex::new(r"(?m)^\s*frame:\s*(.+)$").unwrap());
    let node = NODE_RE.get_or_init(|| Regex::new(r"(?m)^\s*nodeId:\s*(.+)$").unwrap());
    let kind = TYPE_RE.get_or_init(|| Regex::new(r"(?m)^Type:\s*\n\s*(.+)$").unwrap());

    let message = parse_message(block).filter(|m| !m.is_empty())?;
    Some(ReviewComment {
        page: capture(page, block).unwrap_or_default(),
        frame: capture(frame, block).filter(|f| f != FRAME_PLACEHOLDER),
        node_id: capture(node, block),
        kind: CommentType::from_label(&capture(kind, block).unwrap_or_default()),
        message,
        why: parse_why(block).unwrap_or_default(),
    })
}

/// Parse a preview document. Blocks without a message are skipped and at
/// most [`MAX_COMMENTS`] are returned.
pub fn parse_comments(content: &str) -> Vec<ReviewComment> {
    let re = BLOCK_RE.get_or_init(|| Regex::new(r"(?m)^## Comment \d+$").unwrap());
    let comments: Vec<ReviewComment> = re
        .split(content)
        .skip(1)
        .filter_map(parse_block)
        .take(MAX_COMMENTS)
        .collect();
    tracing::debug!(count = comments.len(), "parsed comments document");
    comments
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
