use std::path::PathBuf;

use anyhow::Result;

use crate::git::GitRepo;
use crate::selection::{RealSelectionProvider, Selection, SelectionProvider};
use crate::traits::GitOperations;

/// Interactively picks a worktree and removes it. Returns the removed path,
/// or `None` when the prompt is dismissed (a no-op, not an error).
///
/// # Errors
/// Returns an error if:
/// - The current directory is not inside a git repository
/// - The chosen worktree holds uncommitted state the VCS refuses to discard
/// - Git operations fail
pub fn remove_worktree() -> Result<Option<PathBuf>> {
    let current_dir = std::env::current_dir()?;
    let git_repo = GitRepo::discover(&current_dir)?;
    remove_with(&git_repo, &RealSelectionProvider)
}

/// Remove implementation over injected backends (for testing)
pub fn remove_with(
    git_repo: &dyn GitOperations,
    provider: &dyn SelectionProvider,
) -> Result<Option<PathBuf>> {
    let records = git_repo.list_worktrees()?;
    match provider.select("Select worktree to remove:", records)? {
        Selection::Cancelled => Ok(None),
        Selection::Chosen(record) => {
            println!("Removing worktree: {}", record.path.display());
            git_repo.remove_worktree(&record.path)?;
            println!("✓ Worktree removed successfully!");
            Ok(Some(record.path))
        }
    }
}
