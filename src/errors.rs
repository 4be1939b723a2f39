use std::path::PathBuf;

/// Error taxonomy for the worktree lifecycle. Every variant is terminal for
/// the current invocation; `main` is the single place that renders these and
/// picks the exit status.
#[derive(Debug, thiserror::Error)]
pub enum GroveError {
    #[error("required tool '{tool}' was not found on PATH")]
    MissingDependency { tool: String },

    #[error("not inside a git repository")]
    NotARepository,

    #[error("{message}")]
    InvalidArguments { message: String },

    #[error("unknown command '{command}'")]
    UnknownCommand { command: String },

    #[error("failed to add worktree at {}: {reason}", .path.display())]
    WorktreeAddFailed { path: PathBuf, reason: String },

    #[error("failed to remove worktree at {}: {reason}", .path.display())]
    WorktreeRemovalFailed { path: PathBuf, reason: String },
}
