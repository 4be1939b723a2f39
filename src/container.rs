use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::errors::GroveError;

/// Name of the directory under the repository root that holds every managed
/// worktree.
pub const CONTAINER_DIR: &str = ".worktrees";

/// Derives canonical worktree paths under `<repo-root>/.worktrees/`.
///
/// The container is always a strict child of the repository root; directory
/// names are validated so a worktree path can never escape it or collide with
/// the container itself.
pub struct WorktreeContainer {
    root: PathBuf,
}

impl WorktreeContainer {
    #[must_use]
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            root: repo_root.into(),
        }
    }

    /// The repository root this container belongs to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The container directory itself.
    #[must_use]
    pub fn dir(&self) -> PathBuf {
        self.root.join(CONTAINER_DIR)
    }

    /// Computes the target path for a named worktree.
    ///
    /// # Errors
    /// Returns `InvalidArguments` if `dir_name` is empty, a path traversal
    /// component, or contains path separators.
    pub fn worktree_path(&self, dir_name: &str) -> Result<PathBuf> {
        validate_dir_name(dir_name)?;
        Ok(self.dir().join(dir_name))
    }
}

fn validate_dir_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(GroveError::InvalidArguments {
            message: format!(
                "invalid worktree directory name '{name}': must be a single path component"
            ),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worktree_path_lives_under_container() -> Result<()> {
        let container = WorktreeContainer::new("/repo");
        let path = container.worktree_path("wt1")?;
        assert_eq!(path, PathBuf::from("/repo/.worktrees/wt1"));
        assert!(path.starts_with(container.root()));
        Ok(())
    }

    #[test]
    fn test_container_is_never_the_root() -> Result<()> {
        let container = WorktreeContainer::new("/repo");
        assert_ne!(container.dir(), PathBuf::from("/repo"));
        assert_ne!(container.worktree_path("a")?, PathBuf::from("/repo"));
        Ok(())
    }

    #[test]
    fn test_rejects_names_with_separators() {
        let container = WorktreeContainer::new("/repo");
        assert!(container.worktree_path("a/b").is_err());
        assert!(container.worktree_path("a\\b").is_err());
    }

    #[test]
    fn test_rejects_traversal_components() {
        let container = WorktreeContainer::new("/repo");
        assert!(container.worktree_path("").is_err());
        assert!(container.worktree_path(".").is_err());
        assert!(container.worktree_path("..").is_err());
    }

    #[test]
    fn test_invalid_name_surfaces_as_invalid_arguments() {
        let container = WorktreeContainer::new("/repo");
        let result = container.worktree_path("../escape");
        assert!(matches!(
            result.map_err(|e| e.downcast::<GroveError>()),
            Err(Ok(GroveError::InvalidArguments { .. }))
        ));
    }
}
