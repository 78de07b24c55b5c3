//! # Review Indexer
//!
//! Batch ingestion of product reviews: reads a CSV export, scores the sentiment
//! of every review and writes the results into a Firestore collection.
//!
//! ## Architecture
//!
//! The indexer follows the Consumer-Processor-Loader pattern:
//!
//! 1. **Consumer**: Reads and validates rows from the CSV source
//! 2. **Processor**: Coerces rows into review documents and scores sentiment
//! 3. **Loader**: Commits documents to the store in fixed-size batches
//! 4. **Orchestrator**: Drives rows through the pipeline in source order
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`consumer`]: CSV source for review rows
//! - [`processor`]: Row coercion and sentiment scoring
//! - [`loader`]: Batched writes into the review store
//! - [`orchestrator`]: Coordinates the ingest flow
//! - [`report`]: Aggregations over stored reviews
//! - [`errors`]: Error types for the indexer

pub mod config;
pub mod consumer;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod report;

pub use config::Dependencies;
pub use errors::IngestError;

use review_indexer_repository::{CredentialError, ReviewStoreError};
use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The service-account credential could not be resolved or used.
    #[error("Credential error: {0}")]
    CredentialError(#[from] CredentialError),

    /// Store error outside of the ingest flow.
    #[error("Store error: {0}")]
    StoreError(#[from] ReviewStoreError),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the error is a setup problem (credentials, configuration or an
    /// unusable source) rather than a failure partway through a run.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::ConfigError(_) | Self::CredentialError(_) => true,
            Self::IngestError(e) => e.is_source_problem(),
            Self::StoreError(_) => false,
        }
    }
}
