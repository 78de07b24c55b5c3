//! Response types for review store operations.

/// Outcome of one successful batch commit.
///
/// A commit is atomic, so a summary is only produced when every write in the
/// batch was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCommitSummary {
    /// Number of document writes in the batch.
    pub written: usize,
    /// Server commit timestamp, when the backend reports one.
    pub commit_time: Option<String>,
}

impl BatchCommitSummary {
    /// Create a summary for `written` documents without a commit timestamp.
    pub fn new(written: usize) -> Self {
        Self {
            written,
            commit_time: None,
        }
    }
}
