use std::path::PathBuf;

use anyhow::Result;

use crate::git::GitRepo;
use crate::selection::{RealSelectionProvider, Selection, SelectionProvider};
use crate::traits::GitOperations;

/// Interactively picks a worktree and returns its path, or `None` when the
/// prompt is dismissed.
///
/// The caller prints the path on stdout so the shell wrapper can change into
/// it; this process cannot change its parent shell's directory.
///
/// # Errors
/// Returns an error if:
/// - The current directory is not inside a git repository
/// - Git operations fail
/// - The selection machinery fails
pub fn switch_worktree() -> Result<Option<PathBuf>> {
    let current_dir = std::env::current_dir()?;
    let git_repo = GitRepo::discover(&current_dir)?;
    switch_with(&git_repo, &RealSelectionProvider)
}

/// Switch implementation over injected backends (for testing)
pub fn switch_with(
    git_repo: &dyn GitOperations,
    provider: &dyn SelectionProvider,
) -> Result<Option<PathBuf>> {
    let records = git_repo.list_worktrees()?;
    match provider.select("Switch to worktree:", records)? {
        Selection::Chosen(record) => Ok(Some(record.path)),
        Selection::Cancelled => Ok(None),
    }
}
