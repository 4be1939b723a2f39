use anyhow::Result;

use crate::container::WorktreeContainer;
use crate::git::GitRepo;
use crate::traits::GitOperations;

/// Creates a worktree named `dir_name` for `branch`, creating the branch
/// from the current HEAD when it does not exist yet.
///
/// # Errors
/// Returns an error if:
/// - The current directory is not inside a git repository
/// - The directory name is not a single path component
/// - The worktree cannot be created
pub fn add_worktree(dir_name: &str, branch: &str) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let git_repo = GitRepo::discover(&current_dir)?;
    add_worktree_with(&git_repo, dir_name, branch)
}

/// Add implementation over an injected git backend (for testing)
pub fn add_worktree_with(git_repo: &dyn GitOperations, dir_name: &str, branch: &str) -> Result<()> {
    let container = WorktreeContainer::new(git_repo.repo_root());
    let worktree_path = container.worktree_path(dir_name)?;

    if !git_repo.branch_exists(branch)? {
        println!("Creating new branch: {}", branch);
    }
    println!(
        "Creating worktree for branch '{}' at: {}",
        branch,
        worktree_path.display()
    );

    git_repo.add_worktree(dir_name, &worktree_path, branch)?;

    println!("✓ Worktree created successfully!");
    println!("  Branch: {}", branch);
    println!("  Path: {}", worktree_path.display());

    Ok(())
}
