use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::git::WorktreeRecord;

/// Trait for Git operations to enable mocking in tests
pub trait GitOperations {
    fn repo_root(&self) -> PathBuf;
    fn branch_exists(&self, branch_name: &str) -> Result<bool>;
    fn add_worktree(&self, dir_name: &str, worktree_path: &Path, branch_name: &str) -> Result<()>;
    fn list_worktrees(&self) -> Result<Vec<WorktreeRecord>>;
    fn remove_worktree(&self, worktree_path: &Path) -> Result<()>;
}
