//! In-memory review store.
//!
//! Keeps documents as plain JSON in a sorted map so reads go through the same
//! tolerant decoding as Firestore reads. Used for dry runs and tests. It also
//! records every commit and can be told to reject a specific one.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use review_indexer_shared::{ReviewDocument, ReviewQuery, StoredReview};
use serde_json::Value;
use tracing::debug;

use crate::errors::ReviewStoreError;
use crate::firestore::MAX_WRITES_PER_COMMIT;
use crate::interfaces::ReviewStoreProvider;
use crate::types::BatchCommitSummary;
use crate::utils;

#[derive(Default)]
struct StoreState {
    documents: BTreeMap<String, Value>,
    commit_sizes: Vec<usize>,
    fail_on_commit: Option<usize>,
}

/// Review store backed by process memory.
#[derive(Default)]
pub struct InMemoryReviewStore {
    state: Mutex<StoreState>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `attempt`-th commit (1-based). Earlier commits succeed.
    pub fn failing_on_commit(attempt: usize) -> Self {
        let store = Self::default();
        store.lock().fail_on_commit = Some(attempt);
        store
    }

    /// Store a raw JSON document under `key`, bypassing the write format.
    ///
    /// Lets callers seed documents in older shapes.
    pub fn insert_raw(&self, key: impl Into<String>, document: Value) {
        self.lock().documents.insert(key.into(), document);
    }

    /// Number of stored documents.
    pub fn document_count(&self) -> usize {
        self.lock().documents.len()
    }

    /// Sizes of all successful commits, in order.
    pub fn commit_sizes(&self) -> Vec<usize> {
        self.lock().commit_sizes.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn decode(key: &str, document: &Value) -> Result<StoredReview, ReviewStoreError> {
        let review: StoredReview = serde_json::from_value(document.clone())?;
        Ok(review.with_document_key(key))
    }
}

#[async_trait]
impl ReviewStoreProvider for InMemoryReviewStore {
    async fn check_ready(&self) -> Result<(), ReviewStoreError> {
        Ok(())
    }

    async fn commit_batch(
        &self,
        documents: &[ReviewDocument],
    ) -> Result<BatchCommitSummary, ReviewStoreError> {
        if documents.len() > MAX_WRITES_PER_COMMIT {
            return Err(ReviewStoreError::batch_size_exceeded(
                documents.len(),
                MAX_WRITES_PER_COMMIT,
            ));
        }

        // Encode everything first so a bad document leaves the store untouched
        let mut encoded = Vec::with_capacity(documents.len());
        for doc in documents {
            utils::validate_document_id(doc.document_id())?;
            let value = serde_json::to_value(doc)
                .map_err(|e| ReviewStoreError::serialization(e.to_string()))?;
            encoded.push((doc.review_id.clone(), value));
        }

        let mut state = self.lock();
        let attempt = state.commit_sizes.len() + 1;
        if state.fail_on_commit == Some(attempt) {
            return Err(ReviewStoreError::commit(format!(
                "commit {} rejected by in-memory store",
                attempt
            )));
        }

        for (key, value) in encoded {
            state.documents.insert(key, value);
        }
        state.commit_sizes.push(documents.len());

        debug!(count = documents.len(), commit = attempt, "Batch committed in memory");
        Ok(BatchCommitSummary::new(documents.len()))
    }

    async fn get_review(&self, review_id: &str) -> Result<Option<StoredReview>, ReviewStoreError> {
        let state = self.lock();
        state
            .documents
            .get(review_id)
            .map(|document| Self::decode(review_id, document))
            .transpose()
    }

    async fn query_reviews(
        &self,
        query: &ReviewQuery,
    ) -> Result<Vec<StoredReview>, ReviewStoreError> {
        let state = self.lock();
        let mut reviews = Vec::new();

        // Documents iterate in key order
        for (key, document) in state.documents.iter() {
            let review = Self::decode(key, document)?;
            if query.matches(&review.product_id, review.rating) {
                reviews.push(review);
            }
        }

        // Same paging order as Firestore: (rating, key) under a rating filter
        if query.min_rating.is_some() {
            reviews.sort_by(|a, b| {
                a.rating
                    .unwrap_or(f64::NEG_INFINITY)
                    .total_cmp(&b.rating.unwrap_or(f64::NEG_INFINITY))
            });
        }
        reviews.truncate(query.limit);
        reviews.sort_by(|a, b| a.review_id.cmp(&b.review_id));

        Ok(reviews)
    }
}
