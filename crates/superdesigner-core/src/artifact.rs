use crate::error::DesignError;
use crate::{io, paths};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// ArtifactKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Prd,
    Research,
    Figma,
    Analytics,
}

impl ArtifactKind {
    pub fn all() -> &'static [ArtifactKind] {
        &[
            ArtifactKind::Prd,
            ArtifactKind::Research,
            ArtifactKind::Figma,
            ArtifactKind::Analytics,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Prd => "prd",
            ArtifactKind::Research => "research",
            ArtifactKind::Figma => "figma",
            ArtifactKind::Analytics => "analytics",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            ArtifactKind::Prd => "prd.md",
            ArtifactKind::Research => "research.md",
            ArtifactKind::Figma => "figma.md",
            ArtifactKind::Analytics => "analytics.md",
        }
    }

    /// Short description shown next to the file when a project is created.
    pub fn description(self) -> &'static str {
        match self {
            ArtifactKind::Prd => "Product requirements",
            ArtifactKind::Research => "Research notes",
            ArtifactKind::Figma => "Figma link",
            ArtifactKind::Analytics => "Analytics requirements",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArtifactKind {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prd" => Ok(ArtifactKind::Prd),
            "research" => Ok(ArtifactKind::Research),
            "figma" => Ok(ArtifactKind::Figma),
            "analytics" => Ok(ArtifactKind::Analytics),
            _ => Err(DesignError::InvalidName(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ArtifactSet
// ---------------------------------------------------------------------------

/// The four raw documents that seed a review.
///
/// Every field is always present; a missing source file is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSet {
    pub prd: String,
    pub research: String,
    pub figma: String,
    pub analytics: String,
}

static PROJECT_LINE_RE: OnceLock<Regex> = OnceLock::new();

impl ArtifactSet {
    /// Read all four artifacts from a directory. Unreadable files become empty.
    pub fn load_from(dir: &Path) -> Self {
        let read = |kind: ArtifactKind| io::read_or_empty(&dir.join(kind.filename()));
        let set = Self {
            prd: read(ArtifactKind::Prd),
            research: read(ArtifactKind::Research),
            figma: read(ArtifactKind::Figma),
            analytics: read(ArtifactKind::Analytics),
        };
        tracing::debug!(
            dir = %dir.display(),
            prd = set.prd.len(),
            research = set.research.len(),
            figma = set.figma.len(),
            analytics = set.analytics.len(),
            "loaded artifacts"
        );
        set
    }

    /// Read a project's artifacts from `projects/<slug>/context/`.
    pub fn load(root: &Path, slug: &str) -> Self {
        Self::load_from(&paths::context_dir(root, slug))
    }

    pub fn get(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Prd => &self.prd,
            ArtifactKind::Research => &self.research,
            ArtifactKind::Figma => &self.figma,
            ArtifactKind::Analytics => &self.analytics,
        }
    }

    /// Display name from the PRD's `Project: <name>` header line, if any.
    pub fn project_name(&self) -> Option<String> {
        let re = PROJECT_LINE_RE.get_or_init(|| Regex::new(r"(?m)^Project:[ \t]*(.+)$").unwrap());
        re.captures(&self.prd)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
