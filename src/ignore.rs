//! Global ignore-rule configuration.
//!
//! Ensures the worktree container pattern is present in the user's global
//! ignore file exactly once, registering a default file in git configuration
//! when none is set. The ignore-file location is threaded explicitly through
//! [`IgnoreFileSource`] rather than read from ambient state, so the logic is
//! testable with a fake source.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// The full-line pattern that keeps worktree containers out of version
/// control in every repository.
pub const CONTAINER_IGNORE_PATTERN: &str = ".worktrees/";

/// Where the global ignore file lives, per VCS configuration.
pub trait IgnoreFileSource {
    /// The configured global ignore file, if any.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be read.
    fn ignore_file(&self) -> Result<Option<PathBuf>>;

    /// Records `path` as the global ignore file.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be written.
    fn register_ignore_file(&mut self, path: &Path) -> Result<()>;
}

/// The fixed per-user fallback used when no global ignore file is configured.
///
/// # Errors
/// Returns an error if the home directory cannot be determined.
pub fn default_ignore_file() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Failed to get user home directory")?
        .join(".gitignore"))
}

/// Resolves the global ignore file, registering `default_path` when the
/// configuration has none.
///
/// # Errors
/// Returns an error if the configuration cannot be read or written.
pub fn resolve_ignore_file(
    source: &mut dyn IgnoreFileSource,
    default_path: &Path,
) -> Result<PathBuf> {
    if let Some(path) = source.ignore_file()? {
        log::debug!("global ignore file configured at {}", path.display());
        return Ok(path);
    }
    log::debug!(
        "no global ignore file configured, registering {}",
        default_path.display()
    );
    source.register_ignore_file(default_path)?;
    Ok(default_path.to_path_buf())
}

/// Appends `pattern` to `file` unless a line exactly equal to it is already
/// present (anchored full-line match, not substring). Existing lines are
/// never rewritten; the file is created if missing.
///
/// Running this any number of times leaves exactly one such line.
///
/// # Errors
/// Returns an error if the file cannot be read or appended to.
pub fn append_pattern_if_missing(file: &Path, pattern: &str) -> Result<bool> {
    let contents = if file.exists() {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read ignore file: {}", file.display()))?
    } else {
        String::new()
    };

    if contents.lines().any(|line| line == pattern) {
        return Ok(false);
    }

    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut out = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .with_context(|| format!("Failed to open ignore file: {}", file.display()))?;
    if !contents.is_empty() && !contents.ends_with('\n') {
        writeln!(out)?;
    }
    writeln!(out, "{pattern}")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FakeSource {
        configured: Option<PathBuf>,
        registered: Option<PathBuf>,
    }

    impl FakeSource {
        fn unset() -> Self {
            Self {
                configured: None,
                registered: None,
            }
        }

        fn set(path: PathBuf) -> Self {
            Self {
                configured: Some(path),
                registered: None,
            }
        }
    }

    impl IgnoreFileSource for FakeSource {
        fn ignore_file(&self) -> Result<Option<PathBuf>> {
            Ok(self.configured.clone())
        }

        fn register_ignore_file(&mut self, path: &Path) -> Result<()> {
            self.registered = Some(path.to_path_buf());
            Ok(())
        }
    }

    fn pattern_line_count(file: &Path) -> usize {
        std::fs::read_to_string(file)
            .unwrap_or_default()
            .lines()
            .filter(|line| *line == CONTAINER_IGNORE_PATTERN)
            .count()
    }

    #[test]
    fn test_append_creates_missing_file() -> Result<()> {
        let temp = TempDir::new()?;
        let file = temp.path().join("config").join("ignore");

        let appended = append_pattern_if_missing(&file, CONTAINER_IGNORE_PATTERN)?;
        assert!(appended);
        assert_eq!(pattern_line_count(&file), 1);
        Ok(())
    }

    #[test]
    fn test_append_is_idempotent() -> Result<()> {
        let temp = TempDir::new()?;
        let file = temp.path().join("ignore");

        append_pattern_if_missing(&file, CONTAINER_IGNORE_PATTERN)?;
        let appended = append_pattern_if_missing(&file, CONTAINER_IGNORE_PATTERN)?;
        assert!(!appended);
        assert_eq!(pattern_line_count(&file), 1);
        Ok(())
    }

    #[test]
    fn test_append_preserves_existing_lines() -> Result<()> {
        let temp = TempDir::new()?;
        let file = temp.path().join("ignore");
        std::fs::write(&file, "*.log\nnode_modules/")?;

        append_pattern_if_missing(&file, CONTAINER_IGNORE_PATTERN)?;
        let contents = std::fs::read_to_string(&file)?;
        assert_eq!(contents, "*.log\nnode_modules/\n.worktrees/\n");
        Ok(())
    }

    #[test]
    fn test_substring_match_does_not_count() -> Result<()> {
        let temp = TempDir::new()?;
        let file = temp.path().join("ignore");
        std::fs::write(&file, "vendor/.worktrees/cache\n")?;

        let appended = append_pattern_if_missing(&file, CONTAINER_IGNORE_PATTERN)?;
        assert!(appended);
        assert_eq!(pattern_line_count(&file), 1);
        Ok(())
    }

    #[test]
    fn test_resolve_registers_default_when_unset() -> Result<()> {
        let mut source = FakeSource::unset();
        let default_path = PathBuf::from("/home/user/.gitignore");

        let resolved = resolve_ignore_file(&mut source, &default_path)?;
        assert_eq!(resolved, default_path);
        assert_eq!(source.registered, Some(default_path));
        Ok(())
    }

    #[test]
    fn test_resolve_keeps_configured_file() -> Result<()> {
        let configured = PathBuf::from("/home/user/custom-ignore");
        let mut source = FakeSource::set(configured.clone());

        let resolved = resolve_ignore_file(&mut source, Path::new("/home/user/.gitignore"))?;
        assert_eq!(resolved, configured);
        assert_eq!(source.registered, None);
        Ok(())
    }
}
