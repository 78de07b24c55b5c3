//! Loader module for the review ingest.
//!
//! Buffers review documents and commits them to the store in fixed-size
//! batches.

use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

use crate::errors::IngestError;
use review_indexer_repository::firestore::MAX_WRITES_PER_COMMIT;
use review_indexer_repository::ReviewStoreProvider;
use review_indexer_shared::ReviewDocument;

/// Configuration for the review loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents to buffer before committing.
    pub batch_size: usize,
}

impl LoaderConfig {
    /// Build a config, clamping the batch size to `1..=MAX_WRITES_PER_COMMIT`.
    pub fn new(batch_size: usize) -> Self {
        let clamped = batch_size.clamp(1, MAX_WRITES_PER_COMMIT);
        if clamped != batch_size {
            warn!(
                requested = batch_size,
                used = clamped,
                "Batch size out of range, clamping"
            );
        }
        Self {
            batch_size: clamped,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_WRITES_PER_COMMIT,
        }
    }
}

/// A batch that has been committed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedBatch {
    /// 1-based sequence number of the commit within this loader.
    pub batch_number: usize,
    /// Number of documents in the commit.
    pub size: usize,
}

/// Loader that writes review documents into the store.
///
/// The loader is responsible for:
/// - Buffering documents until the batch size is reached
/// - Committing each full buffer atomically
/// - Committing the final partial buffer on `flush`
pub struct ReviewLoader {
    provider: Arc<dyn ReviewStoreProvider>,
    config: LoaderConfig,
    pending: Vec<ReviewDocument>,
    batches_committed: usize,
    documents_committed: usize,
}

impl ReviewLoader {
    /// Create a new loader with the default batch size.
    pub fn new(provider: Arc<dyn ReviewStoreProvider>) -> Self {
        Self::with_config(provider, LoaderConfig::default())
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(provider: Arc<dyn ReviewStoreProvider>, config: LoaderConfig) -> Self {
        let batch_size = config.batch_size;
        Self {
            provider,
            config,
            pending: Vec::with_capacity(batch_size),
            batches_committed: 0,
            documents_committed: 0,
        }
    }

    /// Add a document to the buffer, committing if the buffer is full.
    ///
    /// Returns the committed batch when this call triggered a commit.
    pub async fn load(
        &mut self,
        document: ReviewDocument,
    ) -> Result<Option<CommittedBatch>, IngestError> {
        self.pending.push(document);

        if self.pending.len() >= self.config.batch_size {
            return self.flush().await;
        }
        Ok(None)
    }

    /// Commit all buffered documents.
    ///
    /// Returns `None` when the buffer was empty.
    #[instrument(skip(self), fields(pending = self.pending.len()))]
    pub async fn flush(&mut self) -> Result<Option<CommittedBatch>, IngestError> {
        if self.pending.is_empty() {
            return Ok(None);
        }

        let documents: Vec<ReviewDocument> = self.pending.drain(..).collect();
        let count = documents.len();

        debug!(count = count, "Committing batch to review store");

        match self.provider.commit_batch(&documents).await {
            Ok(summary) => {
                self.batches_committed += 1;
                self.documents_committed += summary.written;
                debug!(
                    batch = self.batches_committed,
                    written = summary.written,
                    commit_time = ?summary.commit_time,
                    "Batch committed"
                );
                Ok(Some(CommittedBatch {
                    batch_number: self.batches_committed,
                    size: count,
                }))
            }
            Err(e) => {
                error!(error = %e, count = count, "Failed to commit batch");
                Err(IngestError::from(e))
            }
        }
    }

    /// Check if the store is ready.
    pub async fn check_ready(&self) -> Result<(), IngestError> {
        self.provider
            .check_ready()
            .await
            .map_err(|e| IngestError::loader(format!("Review store not ready: {}", e)))
    }

    /// Number of documents waiting for the next commit.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of successful commits so far.
    pub fn batches_committed(&self) -> usize {
        self.batches_committed
    }

    /// Number of documents written by successful commits so far.
    pub fn documents_committed(&self) -> usize {
        self.documents_committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use review_indexer_repository::{BatchCommitSummary, ReviewStoreError};
    use review_indexer_shared::{ReviewQuery, SentimentScores, StoredReview};
    use std::sync::Mutex;

    struct MockProvider {
        commits: Mutex<Vec<Vec<String>>>,
        reject: bool,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                commits: Mutex::new(Vec::new()),
                reject: false,
            }
        }

        fn rejecting() -> Self {
            Self {
                commits: Mutex::new(Vec::new()),
                reject: true,
            }
        }

        fn commit_sizes(&self) -> Vec<usize> {
            self.commits.lock().unwrap().iter().map(Vec::len).collect()
        }
    }

    #[async_trait]
    impl ReviewStoreProvider for MockProvider {
        async fn check_ready(&self) -> Result<(), ReviewStoreError> {
            if self.reject {
                Err(ReviewStoreError::connection("unreachable"))
            } else {
                Ok(())
            }
        }

        async fn commit_batch(
            &self,
            documents: &[ReviewDocument],
        ) -> Result<BatchCommitSummary, ReviewStoreError> {
            if self.reject {
                return Err(ReviewStoreError::commit("rejected"));
            }
            let ids = documents.iter().map(|d| d.review_id.clone()).collect();
            self.commits.lock().unwrap().push(ids);
            Ok(BatchCommitSummary::new(documents.len()))
        }

        async fn get_review(&self, _: &str) -> Result<Option<StoredReview>, ReviewStoreError> {
            Ok(None)
        }

        async fn query_reviews(&self, _: &ReviewQuery) -> Result<Vec<StoredReview>, ReviewStoreError> {
            Ok(Vec::new())
        }
    }

    fn doc(id: usize) -> ReviewDocument {
        ReviewDocument::new(
            format!("r{}", id),
            "p1",
            "text",
            3.0,
            "2024-01-01",
            SentimentScores::NEUTRAL,
        )
    }

    #[test]
    fn test_config_clamps_batch_size() {
        assert_eq!(LoaderConfig::new(0).batch_size, 1);
        assert_eq!(LoaderConfig::new(100).batch_size, 100);
        assert_eq!(LoaderConfig::new(10_000).batch_size, MAX_WRITES_PER_COMMIT);
        assert_eq!(LoaderConfig::default().batch_size, 500);
    }

    #[tokio::test]
    async fn test_commits_when_batch_is_full() {
        let provider = Arc::new(MockProvider::new());
        let mut loader = ReviewLoader::with_config(provider.clone(), LoaderConfig::new(2));

        assert_eq!(loader.load(doc(1)).await.unwrap(), None);
        let committed = loader.load(doc(2)).await.unwrap();
        assert_eq!(
            committed,
            Some(CommittedBatch {
                batch_number: 1,
                size: 2
            })
        );
        assert_eq!(loader.load(doc(3)).await.unwrap(), None);
        assert_eq!(loader.pending_count(), 1);

        let last = loader.flush().await.unwrap();
        assert_eq!(last.map(|b| b.size), Some(1));
        assert_eq!(provider.commit_sizes(), vec![2, 1]);
        assert_eq!(loader.batches_committed(), 2);
        assert_eq!(loader.documents_committed(), 3);
    }

    #[tokio::test]
    async fn test_flush_empty_buffer_is_a_no_op() {
        let provider = Arc::new(MockProvider::new());
        let mut loader = ReviewLoader::new(provider.clone());

        assert_eq!(loader.flush().await.unwrap(), None);
        assert!(provider.commit_sizes().is_empty());
    }

    #[tokio::test]
    async fn test_commit_failure_is_a_loader_error() {
        let mut loader = ReviewLoader::with_config(Arc::new(MockProvider::rejecting()), LoaderConfig::new(1));

        let result = loader.load(doc(1)).await;
        assert!(matches!(result, Err(IngestError::LoaderError(_))));
        assert_eq!(loader.batches_committed(), 0);
        assert!(loader.check_ready().await.is_err());
    }
}
