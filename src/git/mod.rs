use anyhow::{Context, Result};
use git2::{BranchType, ErrorCode, Repository, StatusOptions};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::GroveError;
use crate::ignore::IgnoreFileSource;
use crate::traits::GitOperations;

/// One registered worktree, as reported by the repository. Produced fresh on
/// every listing; nothing here is persisted by grove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeRecord {
    pub path: PathBuf,
    pub branch: String,
}

impl fmt::Display for WorktreeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.branch, self.path.display())
    }
}

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discovers the repository containing `path` and opens its main working
    /// tree. Invocations from inside a linked worktree resolve back to the
    /// primary repository so the worktree container never nests.
    ///
    /// # Errors
    /// Returns `NotARepository` if `path` is not inside a git repository.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|_| GroveError::NotARepository)?;
        let repo = if repo.is_worktree() {
            // commondir is the primary repository's .git directory
            let main_root = repo
                .commondir()
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| repo.commondir().to_path_buf());
            Repository::open(&main_root).map_err(|_| GroveError::NotARepository)?
        } else {
            repo
        };
        Ok(Self { repo })
    }

    /// Absolute path of the main working tree.
    #[must_use]
    pub fn repo_root(&self) -> PathBuf {
        self.repo
            .workdir()
            .unwrap_or_else(|| self.repo.path())
            .to_path_buf()
    }

    /// Checks if a local branch exists in the repository.
    ///
    /// # Errors
    /// Returns an error if git operations fail.
    pub fn branch_exists(&self, branch_name: &str) -> Result<bool> {
        match self.repo.find_branch(branch_name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Creates a worktree named `dir_name` at `worktree_path` checked out to
    /// `branch_name`. An existing branch is reused; otherwise a new branch is
    /// created from the current HEAD commit.
    ///
    /// # Errors
    /// Returns `WorktreeAddFailed` if the target path already exists or any
    /// underlying git operation fails (e.g., the branch is already checked
    /// out in another worktree).
    pub fn add_worktree(
        &self,
        dir_name: &str,
        worktree_path: &Path,
        branch_name: &str,
    ) -> Result<()> {
        let fail = |reason: String| GroveError::WorktreeAddFailed {
            path: worktree_path.to_path_buf(),
            reason,
        };

        if worktree_path.exists() {
            return Err(fail("target path already exists".to_string()).into());
        }

        if let Some(parent) = worktree_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!(
                    "Failed to create worktree container: {}",
                    parent.display()
                )
            })?;
        }

        if !self.branch_exists(branch_name)? {
            log::debug!("branch '{branch_name}' does not exist, creating from HEAD");
            let head = self
                .repo
                .head()
                .map_err(|e| fail(e.message().to_string()))?;
            let commit = head
                .peel_to_commit()
                .map_err(|e| fail(e.message().to_string()))?;
            self.repo
                .branch(branch_name, &commit, false)
                .map_err(|e| fail(e.message().to_string()))?;
        }

        let branch = self
            .repo
            .find_branch(branch_name, BranchType::Local)
            .with_context(|| format!("Failed to find branch '{}'", branch_name))?;

        let mut opts = git2::WorktreeAddOptions::new();
        opts.reference(Some(branch.get()));

        self.repo
            .worktree(dir_name, worktree_path, Some(&opts))
            .map_err(|e| fail(e.message().to_string()))?;

        Ok(())
    }

    /// Lists all worktrees of the repository: the main working tree first,
    /// then linked worktrees in registry order. Re-queried on every call.
    ///
    /// # Errors
    /// Returns an error if git operations fail.
    pub fn list_worktrees(&self) -> Result<Vec<WorktreeRecord>> {
        let mut records = Vec::new();

        if let Some(workdir) = self.repo.workdir() {
            records.push(WorktreeRecord {
                path: workdir.to_path_buf(),
                branch: head_label(&self.repo),
            });
        }

        for name in self.repo.worktrees()?.iter().flatten() {
            let worktree = self.repo.find_worktree(name)?;
            let path = worktree.path().to_path_buf();
            let branch = match Repository::open(&path) {
                Ok(repo) => head_label(&repo),
                Err(_) => "(unavailable)".to_string(),
            };
            records.push(WorktreeRecord { path, branch });
        }

        Ok(records)
    }

    /// Removes the worktree at `worktree_path`: registry metadata and the
    /// working directory.
    ///
    /// The worktree is inspected before anything is touched; a worktree with
    /// modified or untracked files is refused so the caller keeps the
    /// decision to force-remove or abandon.
    ///
    /// # Errors
    /// Returns `WorktreeRemovalFailed` if `worktree_path` is the main working
    /// tree, is not a registered worktree, or holds uncommitted state.
    pub fn remove_worktree(&self, worktree_path: &Path) -> Result<()> {
        let fail = |reason: String| GroveError::WorktreeRemovalFailed {
            path: worktree_path.to_path_buf(),
            reason,
        };

        if let Some(workdir) = self.repo.workdir() {
            if workdir == worktree_path {
                return Err(fail("cannot remove the main working tree".to_string()).into());
            }
        }

        let name = self.worktree_name_for(worktree_path)?;

        // Inspect before mutating anything so a refusal leaves both the
        // registry and the directory intact.
        let worktree_repo =
            Repository::open(worktree_path).map_err(|e| fail(e.message().to_string()))?;
        let mut status_opts = StatusOptions::new();
        status_opts.include_untracked(true);
        let statuses = worktree_repo
            .statuses(Some(&mut status_opts))
            .map_err(|e| fail(e.message().to_string()))?;
        if !statuses.is_empty() {
            return Err(fail("contains modified or untracked files".to_string()).into());
        }

        let worktree = self.repo.find_worktree(&name)?;
        let mut prune_opts = git2::WorktreePruneOptions::new();
        prune_opts.valid(true).working_tree(true);
        worktree
            .prune(Some(&mut prune_opts))
            .map_err(|e| fail(e.message().to_string()))?;

        Ok(())
    }

    fn worktree_name_for(&self, worktree_path: &Path) -> Result<String> {
        for name in self.repo.worktrees()?.iter().flatten() {
            let worktree = self.repo.find_worktree(name)?;
            if worktree.path() == worktree_path {
                return Ok(name.to_string());
            }
        }
        Err(GroveError::WorktreeRemovalFailed {
            path: worktree_path.to_path_buf(),
            reason: "not a registered worktree of this repository".to_string(),
        }
        .into())
    }
}

/// Label for a repository's checked-out state: branch shorthand, or a short
/// commit id when HEAD is detached.
fn head_label(repo: &Repository) -> String {
    match repo.head() {
        Ok(head) if head.is_branch() => head.shorthand().unwrap_or("HEAD").to_string(),
        Ok(head) => match head.peel_to_commit() {
            Ok(commit) => {
                let id = commit.id().to_string();
                let short = &id[..id.len().min(7)];
                format!("detached@{short}")
            }
            Err(_) => "HEAD".to_string(),
        },
        // Unborn branch: a freshly initialized repository with no commits
        Err(_) => "(no commits)".to_string(),
    }
}

/// Read/write access to the git global configuration, used to resolve and
/// register the global ignore file.
pub struct GitGlobalConfig {
    config: git2::Config,
    global_path: PathBuf,
}

impl GitGlobalConfig {
    /// Opens the default configuration chain (system, global, XDG) for
    /// reading, and resolves the global config file for writing. A global
    /// file that does not exist yet is created on first write.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be opened.
    pub fn open() -> Result<Self> {
        let config = git2::Config::open_default().context("Failed to open git configuration")?;
        let global_path = match git2::Config::find_global() {
            Ok(path) => path,
            // No global config file yet: use the conventional location
            Err(_) => dirs::home_dir()
                .context("Failed to get user home directory")?
                .join(".gitconfig"),
        };
        Ok(Self {
            config,
            global_path,
        })
    }
}

impl IgnoreFileSource for GitGlobalConfig {
    fn ignore_file(&self) -> Result<Option<PathBuf>> {
        match self.config.get_path("core.excludesfile") {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn register_ignore_file(&mut self, path: &Path) -> Result<()> {
        let mut global = git2::Config::open(&self.global_path)
            .context("Failed to open global git configuration for writing")?;
        global
            .set_str("core.excludesfile", &path.to_string_lossy())
            .context("Failed to set core.excludesfile")?;
        Ok(())
    }
}

impl GitOperations for GitRepo {
    fn repo_root(&self) -> PathBuf {
        self.repo_root()
    }

    fn branch_exists(&self, branch_name: &str) -> Result<bool> {
        self.branch_exists(branch_name)
    }

    fn add_worktree(&self, dir_name: &str, worktree_path: &Path, branch_name: &str) -> Result<()> {
        self.add_worktree(dir_name, worktree_path, branch_name)
    }

    fn list_worktrees(&self) -> Result<Vec<WorktreeRecord>> {
        self.list_worktrees()
    }

    fn remove_worktree(&self, worktree_path: &Path) -> Result<()> {
        self.remove_worktree(worktree_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use tempfile::TempDir;

    fn init_repo(dir: &Path) -> Result<Repository> {
        let repo = Repository::init(dir)?;
        {
            let mut config = repo.config()?;
            config.set_str("user.name", "Test User")?;
            config.set_str("user.email", "test@example.com")?;

            let sig = Signature::now("Test User", "test@example.com")?;
            let tree_id = {
                let mut index = repo.index()?;
                index.write_tree()?
            };
            let tree = repo.find_tree(tree_id)?;
            repo.commit(Some("HEAD"), &sig, &sig, "initial commit", &tree, &[])?;
        }
        Ok(repo)
    }

    fn open_test_repo() -> Result<(TempDir, GitRepo)> {
        let temp = TempDir::new()?;
        init_repo(temp.path())?;
        let git_repo = GitRepo::discover(temp.path())?;
        Ok((temp, git_repo))
    }

    #[test]
    fn test_discover_outside_repository_fails() -> Result<()> {
        let temp = TempDir::new()?;
        let result = GitRepo::discover(temp.path());
        assert!(matches!(
            result.map_err(|e| e.downcast::<GroveError>()),
            Err(Ok(GroveError::NotARepository))
        ));
        Ok(())
    }

    #[test]
    fn test_branch_exists() -> Result<()> {
        let (_temp, git_repo) = open_test_repo()?;
        assert!(!git_repo.branch_exists("feat")?);

        let head = git_repo.repo.head()?.peel_to_commit()?;
        git_repo.repo.branch("feat", &head, false)?;
        assert!(git_repo.branch_exists("feat")?);
        Ok(())
    }

    #[test]
    fn test_add_creates_branch_from_precall_head() -> Result<()> {
        let (_temp, git_repo) = open_test_repo()?;
        let head_before = git_repo.repo.head()?.peel_to_commit()?.id();

        let target = git_repo.repo_root().join(".worktrees").join("wt1");
        git_repo.add_worktree("wt1", &target, "feat")?;

        assert!(target.is_dir());
        let branch = git_repo.repo.find_branch("feat", BranchType::Local)?;
        assert_eq!(branch.get().peel_to_commit()?.id(), head_before);

        let worktree_repo = Repository::open(&target)?;
        assert_eq!(worktree_repo.head()?.shorthand(), Some("feat"));
        Ok(())
    }

    #[test]
    fn test_add_reuses_existing_branch() -> Result<()> {
        let (_temp, git_repo) = open_test_repo()?;
        let head = git_repo.repo.head()?.peel_to_commit()?;
        git_repo.repo.branch("existing", &head, false)?;
        let branches_before = git_repo.repo.branches(Some(BranchType::Local))?.count();

        let target = git_repo.repo_root().join(".worktrees").join("wt1");
        git_repo.add_worktree("wt1", &target, "existing")?;

        let branches_after = git_repo.repo.branches(Some(BranchType::Local))?.count();
        assert_eq!(branches_before, branches_after);

        let worktree_repo = Repository::open(&target)?;
        assert_eq!(worktree_repo.head()?.shorthand(), Some("existing"));
        Ok(())
    }

    #[test]
    fn test_add_fails_when_target_exists() -> Result<()> {
        let (_temp, git_repo) = open_test_repo()?;
        let target = git_repo.repo_root().join(".worktrees").join("wt1");
        git_repo.add_worktree("wt1", &target, "feat")?;

        let result = git_repo.add_worktree("wt1", &target, "other");
        assert!(matches!(
            result.map_err(|e| e.downcast::<GroveError>()),
            Err(Ok(GroveError::WorktreeAddFailed { .. }))
        ));
        Ok(())
    }

    #[test]
    fn test_list_includes_main_worktree_first() -> Result<()> {
        let (_temp, git_repo) = open_test_repo()?;
        let target = git_repo.repo_root().join(".worktrees").join("wt1");
        git_repo.add_worktree("wt1", &target, "feat")?;

        let records = git_repo.list_worktrees()?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path, git_repo.repo_root());
        assert_eq!(records[1].branch, "feat");
        Ok(())
    }

    #[test]
    fn test_remove_clean_worktree() -> Result<()> {
        let (_temp, git_repo) = open_test_repo()?;
        let target = git_repo.repo_root().join(".worktrees").join("wt1");
        git_repo.add_worktree("wt1", &target, "feat")?;

        let records = git_repo.list_worktrees()?;
        let record = &records[1];
        git_repo.remove_worktree(&record.path)?;

        assert!(!record.path.exists());
        assert_eq!(git_repo.list_worktrees()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_remove_refuses_dirty_worktree() -> Result<()> {
        let (_temp, git_repo) = open_test_repo()?;
        let target = git_repo.repo_root().join(".worktrees").join("wt1");
        git_repo.add_worktree("wt1", &target, "feat")?;

        let records = git_repo.list_worktrees()?;
        let record = records[1].clone();
        std::fs::write(record.path.join("scratch.txt"), "uncommitted")?;

        let result = git_repo.remove_worktree(&record.path);
        assert!(matches!(
            result.map_err(|e| e.downcast::<GroveError>()),
            Err(Ok(GroveError::WorktreeRemovalFailed { .. }))
        ));

        // Refusal leaves both the directory and the registry entry intact
        assert!(record.path.exists());
        assert_eq!(git_repo.list_worktrees()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_remove_refuses_main_working_tree() -> Result<()> {
        let (_temp, git_repo) = open_test_repo()?;
        let root = git_repo.repo_root();

        let result = git_repo.remove_worktree(&root);
        assert!(matches!(
            result.map_err(|e| e.downcast::<GroveError>()),
            Err(Ok(GroveError::WorktreeRemovalFailed { .. }))
        ));
        Ok(())
    }

    #[test]
    fn test_discover_from_linked_worktree_resolves_main_root() -> Result<()> {
        let (_temp, git_repo) = open_test_repo()?;
        let root = git_repo.repo_root();
        let target = root.join(".worktrees").join("wt1");
        git_repo.add_worktree("wt1", &target, "feat")?;

        let from_worktree = GitRepo::discover(&target)?;
        assert_eq!(from_worktree.repo_root(), root);
        Ok(())
    }
}
