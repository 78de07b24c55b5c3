//! Error types for the review ingestion pipeline.

use thiserror::Error;

use review_indexer_repository::ReviewStoreError;

/// Errors that can occur while ingesting reviews.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The source file does not exist.
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    /// The source could not be read or a record could not be decoded.
    #[error("Source error: {0}")]
    SourceError(String),

    /// A required column is absent from the header row.
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    /// A data row could not be coerced into a review document.
    #[error("Invalid row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    /// Error from the loader component.
    #[error("Loader error: {0}")]
    LoaderError(String),
}

impl IngestError {
    /// Create a source error.
    pub fn source_error(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn(column.into())
    }

    /// Create an invalid row error.
    pub fn invalid_row(row: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            row,
            reason: reason.into(),
        }
    }

    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }

    /// Whether the error is a problem with the input as a whole, found before
    /// any document was written.
    pub fn is_source_problem(&self) -> bool {
        matches!(self, Self::SourceNotFound(_) | Self::MissingColumn(_))
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::SourceError(err.to_string())
    }
}

impl From<ReviewStoreError> for IngestError {
    fn from(err: ReviewStoreError) -> Self {
        Self::LoaderError(err.to_string())
    }
}
