use anyhow::Result;
use inquire::{InquireError, Select};

use crate::git::WorktreeRecord;

/// Outcome of an interactive selection: a chosen record, or dismissal of the
/// prompt. Cancellation is a normal outcome, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(WorktreeRecord),
    Cancelled,
}

/// Trait for providing interactive selection functionality
/// This allows us to abstract away the interactive prompts for testing
pub trait SelectionProvider {
    /// Present the candidate worktrees and return the user's choice.
    ///
    /// Implementations must not mutate any state, and must return
    /// `Selection::Cancelled` immediately when there are no candidates.
    ///
    /// # Errors
    /// Returns an error only if the selection machinery itself fails;
    /// dismissing the prompt is the `Cancelled` outcome, not an error.
    fn select(&self, prompt: &str, candidates: Vec<WorktreeRecord>) -> Result<Selection>;
}

/// Real implementation using inquire::Select for production use
pub struct RealSelectionProvider;

impl SelectionProvider for RealSelectionProvider {
    fn select(&self, prompt: &str, candidates: Vec<WorktreeRecord>) -> Result<Selection> {
        if candidates.is_empty() {
            return Ok(Selection::Cancelled);
        }

        match Select::new(prompt, candidates)
            .with_page_size(10)
            .with_vim_mode(true)
            .prompt()
        {
            Ok(record) => Ok(Selection::Chosen(record)),
            // Esc and Ctrl-C both dismiss the prompt without a choice
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Ok(Selection::Cancelled)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Mock implementation for testing that answers deterministically
pub struct MockSelectionProvider {
    choice: Option<String>,
}

impl MockSelectionProvider {
    /// A provider that picks the candidate whose branch label matches.
    #[must_use]
    pub fn choosing(branch: impl Into<String>) -> Self {
        Self {
            choice: Some(branch.into()),
        }
    }

    /// A provider that dismisses every prompt.
    #[must_use]
    pub fn cancelling() -> Self {
        Self { choice: None }
    }
}

impl SelectionProvider for MockSelectionProvider {
    fn select(&self, _prompt: &str, candidates: Vec<WorktreeRecord>) -> Result<Selection> {
        match &self.choice {
            None => Ok(Selection::Cancelled),
            Some(want) => candidates
                .into_iter()
                .find(|record| &record.branch == want)
                .map(Selection::Chosen)
                .ok_or_else(|| {
                    anyhow::anyhow!("Mock choice '{}' not found in candidates", want)
                }),
        }
    }
}
