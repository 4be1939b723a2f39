use std::path::Path;

use anyhow::Result;

use crate::git::GitGlobalConfig;
use crate::ignore::{self, CONTAINER_IGNORE_PATTERN, IgnoreFileSource};

/// One-time environment setup: makes sure the worktree container pattern is
/// in the global ignore file, registering a default file when none is
/// configured. Safe to run any number of times.
///
/// # Errors
/// Returns an error if:
/// - The git configuration cannot be read or written
/// - The ignore file cannot be read or appended to
pub fn run_setup() -> Result<()> {
    let mut source = GitGlobalConfig::open()?;
    let default_path = ignore::default_ignore_file()?;
    setup_with(&mut source, &default_path)
}

/// Setup implementation over an injected configuration source (for testing)
pub fn setup_with(source: &mut dyn IgnoreFileSource, default_path: &Path) -> Result<()> {
    let ignore_file = ignore::resolve_ignore_file(source, default_path)?;
    let appended = ignore::append_pattern_if_missing(&ignore_file, CONTAINER_IGNORE_PATTERN)?;

    if appended {
        println!(
            "Added '{}' to global ignore file: {}",
            CONTAINER_IGNORE_PATTERN,
            ignore_file.display()
        );
    } else {
        println!(
            "Global ignore file already contains '{}': {}",
            CONTAINER_IGNORE_PATTERN,
            ignore_file.display()
        );
    }

    println!("✓ Setup complete");
    Ok(())
}
