pub mod comment;
pub mod convert;
pub mod doctor;
pub mod init;
pub mod list;
pub mod review;

use anyhow::bail;
use std::path::Path;
use superdesigner_core::{paths, project};

/// Version reported in telemetry events.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Target keyword that selects every project.
pub const ALL_TARGET: &str = "all";

/// Resolve a command target to project slugs.
///
/// `all` selects every project. An omitted target selects the only project
/// when there is exactly one; otherwise the available slugs are listed in
/// the error.
pub fn resolve_targets(root: &Path, target: Option<&str>) -> anyhow::Result<Vec<String>> {
    match target {
        Some(ALL_TARGET) => {
            let slugs = project::list(root)?;
            if slugs.is_empty() {
                bail!("no projects found in {}", paths::projects_dir(root).display());
            }
            Ok(slugs)
        }
        Some(slug) => {
            paths::validate_slug(slug)?;
            if !project::exists(root, slug) {
                bail!("{}", not_found_message(root, slug)?);
            }
            Ok(vec![slug.to_string()])
        }
        None => Ok(vec![select_single(root)?]),
    }
}

/// Resolve a target that must name exactly one project.
pub fn resolve_single(root: &Path, slug: Option<&str>) -> anyhow::Result<String> {
    match slug {
        Some(ALL_TARGET) => bail!("this command takes a single project slug, not \"all\""),
        Some(_) => Ok(resolve_targets(root, slug)?.remove(0)),
        None => select_single(root),
    }
}

fn select_single(root: &Path) -> anyhow::Result<String> {
    let mut slugs = project::list(root)?;
    match slugs.len() {
        0 => bail!(
            "no projects found in {}: create one with `superdesigner init \"My Project\"`",
            paths::projects_dir(root).display()
        ),
        1 => Ok(slugs.remove(0)),
        _ => bail!("several projects found, pick one: {}", slugs.join(", ")),
    }
}

fn not_found_message(root: &Path, slug: &str) -> anyhow::Result<String> {
    let slugs = project::list(root)?;
    Ok(if slugs.is_empty() {
        format!("project not found: {slug}")
    } else {
        format!("project not found: {slug} (available: {})", slugs.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace(slugs: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for slug in slugs {
            std::fs::create_dir_all(paths::project_dir(dir.path(), slug)).unwrap();
        }
        dir
    }

    #[test]
    fn single_project_is_auto_selected() {
        let dir = workspace(&["quest"]);
        assert_eq!(resolve_targets(dir.path(), None).unwrap(), vec!["quest"]);
        assert_eq!(resolve_single(dir.path(), None).unwrap(), "quest");
    }

    #[test]
    fn ambiguous_selection_lists_projects() {
        let dir = workspace(&["alpha", "beta"]);
        let err = resolve_targets(dir.path(), None).unwrap_err().to_string();
        assert!(err.contains("alpha, beta"), "{err}");
    }

    #[test]
    fn all_selects_every_project() {
        let dir = workspace(&["beta", "alpha"]);
        assert_eq!(
            resolve_targets(dir.path(), Some("all")).unwrap(),
            vec!["alpha", "beta"]
        );
        assert!(resolve_single(dir.path(), Some("all")).is_err());
    }

    #[test]
    fn unknown_slug_is_an_error() {
        let dir = workspace(&["alpha"]);
        let err = resolve_targets(dir.path(), Some("gamma")).unwrap_err().to_string();
        assert!(err.contains("project not found: gamma (available: alpha)"), "{err}");
    }

    #[test]
    fn long_slug_resolves() {
        let slug = "quarterly-onboarding-quest-rewards-redesign-for-returning-power-users-v2";
        let dir = workspace(&[slug, "other"]);
        assert_eq!(resolve_targets(dir.path(), Some(slug)).unwrap(), vec![slug]);
        assert_eq!(resolve_single(dir.path(), Some(slug)).unwrap(), slug);
    }

    #[test]
    fn empty_workspace() {
        let dir = TempDir::new().unwrap();
        assert!(resolve_targets(dir.path(), Some("all")).is_err());
        assert!(resolve_single(dir.path(), None).is_err());
    }
}
