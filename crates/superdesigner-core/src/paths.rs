use crate::error::{DesignError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PROJECTS_DIR: &str = "projects";
pub const WORKSPACE_DIR: &str = ".superdesigner";
pub const CONFIG_FILE: &str = ".superdesigner/config.yaml";

pub const CONTEXT_DIR: &str = "context";
pub const RAW_DIR: &str = "raw";
pub const PROMPTS_DIR: &str = "prompts";
pub const INSIGHTS_DIR: &str = "insights";

pub const DESIGN_REVIEW_FILE: &str = "design-review.md";
pub const COMMENTS_PREVIEW_FILE: &str = "design-comments.preview.md";
pub const REVIEW_PROMPT_FILE: &str = "_review_prompt.md";
pub const REVIEW_CONTEXT_FILE: &str = "_review_context.md";
pub const CONVERT_PROMPT_FILE: &str = "_convert_prompt.md";
pub const CONVERT_CONTEXT_FILE: &str = "_convert_context.md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn projects_dir(root: &Path) -> PathBuf {
    root.join(PROJECTS_DIR)
}

pub fn project_dir(root: &Path, slug: &str) -> PathBuf {
    projects_dir(root).join(slug)
}

pub fn context_dir(root: &Path, slug: &str) -> PathBuf {
    project_dir(root, slug).join(CONTEXT_DIR)
}

pub fn raw_dir(root: &Path, slug: &str) -> PathBuf {
    project_dir(root, slug).join(RAW_DIR)
}

pub fn convert_prompts_dir(root: &Path, slug: &str) -> PathBuf {
    project_dir(root, slug).join(PROMPTS_DIR)
}

pub fn insights_dir(root: &Path, slug: &str) -> PathBuf {
    project_dir(root, slug).join(INSIGHTS_DIR)
}

pub fn review_prompts_dir(root: &Path, slug: &str) -> PathBuf {
    insights_dir(root, slug).join(PROMPTS_DIR)
}

pub fn design_review_path(root: &Path, slug: &str) -> PathBuf {
    insights_dir(root, slug).join(DESIGN_REVIEW_FILE)
}

pub fn comments_preview_path(root: &Path, slug: &str) -> PathBuf {
    insights_dir(root, slug).join(COMMENTS_PREVIEW_FILE)
}

pub fn review_prompt_path(root: &Path, slug: &str) -> PathBuf {
    review_prompts_dir(root, slug).join(REVIEW_PROMPT_FILE)
}

pub fn review_context_path(root: &Path, slug: &str) -> PathBuf {
    review_prompts_dir(root, slug).join(REVIEW_CONTEXT_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn workspace_dir(root: &Path) -> PathBuf {
    root.join(WORKSPACE_DIR)
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();
static STRIP_RE: OnceLock<Regex> = OnceLock::new();
static SPACE_RE: OnceLock<Regex> = OnceLock::new();
static HYPHENS_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

/// Convert a display name into a folder-safe slug.
///
/// `"Botim Quest"` becomes `"botim-quest"`. Input with no letters or digits
/// produces an empty string, which callers must reject.
pub fn slugify(name: &str) -> String {
    let strip = STRIP_RE.get_or_init(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
    let space = SPACE_RE.get_or_init(|| Regex::new(r"\s+").unwrap());
    let hyphens = HYPHENS_RE.get_or_init(|| Regex::new(r"-+").unwrap());

    let lowered = name.to_lowercase();
    let stripped = strip.replace_all(lowered.trim(), "");
    let spaced = space.replace_all(&stripped, "-");
    let collapsed = hyphens.replace_all(&spaced, "-");

    let s = collapsed.as_ref();
    let s = s.strip_prefix('-').unwrap_or(s);
    let s = s.strip_suffix('-').unwrap_or(s);
    s.to_string()
}

/// A slug is a single path segment of `[a-z0-9-]` that neither starts nor
/// ends with a hyphen. Length is not bounded.
pub fn validate_slug(slug: &str) -> Result<()> {
    if !slug_re().is_match(slug) {
        return Err(DesignError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
