//! Review store error types.
//!
//! This module defines the unified error type for all review store operations,
//! covering transport failures, rejected commits and undecodable responses.

use thiserror::Error;

/// Unified errors from review store operations.
///
/// Used by the `ReviewStoreProvider` trait and all of its implementations.
#[derive(Debug, Clone, Error)]
pub enum ReviewStoreError {
    /// Validation error (e.g., an unusable document id).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to reach the store backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to obtain or use an access token.
    #[error("Auth error: {0}")]
    AuthError(String),

    /// A batch commit was rejected. Nothing from that batch was written.
    #[error("Commit error: {0}")]
    CommitError(String),

    /// A read or query request failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to parse a response from the backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a document for the backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Batch size exceeds what a single commit may carry.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },
}

impl ReviewStoreError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an auth error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    /// Create a commit error.
    pub fn commit(msg: impl Into<String>) -> Self {
        Self::CommitError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }
}

impl From<reqwest::Error> for ReviewStoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::ConnectionError(err.to_string())
    }
}

impl From<serde_json::Error> for ReviewStoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}
