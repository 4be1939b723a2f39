use crate::errors::GroveError;

/// External executables the tool still relies on. Worktree and config access
/// go through libgit2 in-process, but the generated shell integration and the
/// workflows grove orchestrates drive the git CLI.
pub const REQUIRED_TOOLS: &[&str] = &["git"];

/// Verifies that every production dependency is installed.
///
/// Runs before any command is dispatched; a missing tool aborts the
/// invocation.
///
/// # Errors
/// Returns `MissingDependency` naming the first tool that cannot be found.
pub fn check() -> Result<(), GroveError> {
    ensure_installed(REQUIRED_TOOLS)
}

/// Checks an arbitrary tool list for presence on PATH.
///
/// # Errors
/// Returns `MissingDependency` naming the first tool that cannot be found.
pub fn ensure_installed(tools: &[&str]) -> Result<(), GroveError> {
    for tool in tools {
        if which::which(tool).is_err() {
            return Err(GroveError::MissingDependency {
                tool: (*tool).to_string(),
            });
        }
    }
    Ok(())
}
