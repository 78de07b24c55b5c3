//! Review store provider trait definition.
//!
//! This module defines the abstract interface for review store operations,
//! allowing for different backend implementations (Firestore, in-memory, etc.).

use async_trait::async_trait;
use review_indexer_shared::{ReviewDocument, ReviewQuery, StoredReview};

use crate::errors::ReviewStoreError;
use crate::types::BatchCommitSummary;

/// Abstracts the underlying document store holding the review collection.
///
/// Implementations are bound to one collection when they are constructed.
/// They are shared as `Arc<dyn ReviewStoreProvider>` between the ingestion
/// loader and the query side, which keeps both testable with mock stores.
///
/// # Note on Document Creation
///
/// There is no separate create or update call. `commit_batch` writes every
/// document as a full upsert keyed by `review_id`: an existing document with
/// the same id is replaced, otherwise a new one is created.
#[async_trait]
pub trait ReviewStoreProvider: Send + Sync {
    /// Verify that the store is reachable and the credentials are accepted.
    ///
    /// Called once at startup, before any row is read.
    async fn check_ready(&self) -> Result<(), ReviewStoreError>;

    /// Write a batch of documents in one atomic commit.
    ///
    /// Either every document in `documents` is written or none is. If the same
    /// `review_id` appears more than once, the last occurrence wins.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchCommitSummary)` - If the whole batch was committed
    /// * `Err(ReviewStoreError)` - If the commit was rejected or could not be sent
    async fn commit_batch(
        &self,
        documents: &[ReviewDocument],
    ) -> Result<BatchCommitSummary, ReviewStoreError>;

    /// Fetch a single review by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(StoredReview))` - If the document exists
    /// * `Ok(None)` - If it does not
    /// * `Err(ReviewStoreError)` - If the read fails
    async fn get_review(&self, review_id: &str) -> Result<Option<StoredReview>, ReviewStoreError>;

    /// Run a filtered query over the collection.
    ///
    /// At most `query.limit` reviews are returned. The limit is applied in
    /// document key order, or in (rating, document key) order when
    /// `min_rating` is set, so every implementation selects the same page.
    /// The returned reviews are sorted by `review_id`.
    async fn query_reviews(&self, query: &ReviewQuery)
        -> Result<Vec<StoredReview>, ReviewStoreError>;
}
