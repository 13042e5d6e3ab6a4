use std::path::{Path, PathBuf};
use superdesigner_core::paths;

/// Resolve the workspace root.
///
/// Priority:
/// 1. `--root` flag / `SUPERDESIGNER_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `projects/`
/// 3. Walk upward from `cwd` looking for `.superdesigner/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_from(explicit, &cwd)
}

fn resolve_from(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    find_upward(cwd, paths::PROJECTS_DIR)
        .or_else(|| find_upward(cwd, paths::WORKSPACE_DIR))
        .unwrap_or_else(|| cwd.to_path_buf())
}

fn find_upward(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("projects")).unwrap();
        let other = TempDir::new().unwrap();
        assert_eq!(resolve_from(Some(other.path()), dir.path()), other.path());
    }

    #[test]
    fn finds_projects_dir_above_cwd() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("projects/quest/context");
        std::fs::create_dir_all(&deep).unwrap();
        assert_eq!(resolve_from(None, &deep), dir.path());
    }

    #[test]
    fn projects_dir_beats_workspace_marker() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".superdesigner")).unwrap();
        let inner = dir.path().join("design");
        std::fs::create_dir_all(inner.join("projects")).unwrap();
        assert_eq!(resolve_from(None, &inner), inner);
    }

    #[test]
    fn finds_workspace_marker() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".superdesigner")).unwrap();
        let sub = dir.path().join("notes");
        std::fs::create_dir_all(&sub).unwrap();
        assert_eq!(resolve_from(None, &sub), dir.path());
    }
}
