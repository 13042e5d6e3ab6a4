use crate::artifact::{ArtifactKind, ArtifactSet};
use crate::error::{DesignError, Result};
use crate::{io, paths, templates};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A project folder under `projects/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub slug: String,
    pub path: PathBuf,
}

impl Project {
    /// Scaffold `projects/<slug>/` with the four artifact templates.
    ///
    /// Fails if the name has no letters or digits, or the folder exists.
    pub fn create(root: &Path, name: &str, created: DateTime<Utc>) -> Result<Self> {
        let name = name.trim();
        let slug = paths::slugify(name);
        if slug.is_empty() {
            return Err(DesignError::InvalidName(name.to_string()));
        }
        paths::validate_slug(&slug)?;

        let path = paths::project_dir(root, &slug);
        if path.exists() {
            return Err(DesignError::ProjectExists(slug));
        }

        let stamp = created.to_rfc3339_opts(SecondsFormat::Millis, true);
        let context = paths::context_dir(root, &slug);
        for &kind in ArtifactKind::all() {
            let content = templates::render(kind, name, &stamp);
            io::atomic_write(&context.join(kind.filename()), content.as_bytes())?;
        }
        io::ensure_dir(&paths::raw_dir(root, &slug))?;
        io::ensure_dir(&paths::review_prompts_dir(root, &slug))?;

        tracing::debug!(slug = %slug, path = %path.display(), "created project");
        Ok(Self {
            name: name.to_string(),
            slug,
            path,
        })
    }

    /// Open an existing project. The display name comes from the PRD's
    /// `Project:` line, else the slug.
    pub fn open(root: &Path, slug: &str) -> Result<Self> {
        let path = paths::project_dir(root, slug);
        if !path.is_dir() {
            return Err(DesignError::ProjectNotFound(slug.to_string()));
        }
        let name = ArtifactSet::load(root, slug)
            .project_name()
            .unwrap_or_else(|| slug.to_string());
        Ok(Self {
            name,
            slug: slug.to_string(),
            path,
        })
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

pub fn exists(root: &Path, slug: &str) -> bool {
    paths::project_dir(root, slug).is_dir()
}

/// Slugs of every project folder, sorted. Hidden entries and plain files
/// are skipped; a missing `projects/` folder lists nothing.
pub fn list(root: &Path) -> Result<Vec<String>> {
    let dir = paths::projects_dir(root);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut slugs = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !entry.file_type()?.is_dir() {
            continue;
        }
        slugs.push(name);
    }
    slugs.sort();
    Ok(slugs)
}
