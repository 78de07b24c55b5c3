//! Orchestrator module for the review ingest.
//!
//! Coordinates the processor and loader over a stream of source rows.

use tracing::{info, instrument};

use crate::consumer::SourceRow;
use crate::errors::IngestError;
use crate::loader::{CommittedBatch, ReviewLoader};
use crate::processor::ReviewProcessor;

/// Outcome of a completed ingest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of rows turned into documents.
    pub rows_processed: usize,
    /// Number of commits issued to the store.
    pub batches_committed: usize,
}

/// Orchestrator that drives rows through the ingest.
///
/// Rows are handled strictly in source order on the calling task. A commit
/// is awaited before the next row is read, and the first error ends the run.
/// Batches committed before the error stay in the store.
pub struct Orchestrator {
    processor: ReviewProcessor,
    loader: ReviewLoader,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(processor: ReviewProcessor, loader: ReviewLoader) -> Self {
        Self { processor, loader }
    }

    /// Run the ingest over `source` until it is exhausted or a row fails.
    #[instrument(skip(self, source))]
    pub async fn run<I>(&mut self, source: I) -> Result<IngestReport, IngestError>
    where
        I: IntoIterator<Item = Result<SourceRow, IngestError>>,
    {
        info!("Starting review ingest");

        self.loader.check_ready().await?;

        let mut rows_processed = 0;
        let mut last_row = 0;

        for row in source {
            let row = row?;
            last_row = row.row_number;

            let document = self.processor.process_row(row)?;
            rows_processed += 1;

            if let Some(batch) = self.loader.load(document).await? {
                log_batch(&batch, last_row);
            }
        }

        if let Some(batch) = self.loader.flush().await? {
            log_batch(&batch, last_row);
        }

        let report = IngestReport {
            rows_processed,
            batches_committed: self.loader.batches_committed(),
        };

        info!(
            rows_processed = report.rows_processed,
            batches_committed = report.batches_committed,
            "Upload complete"
        );
        Ok(report)
    }
}

fn log_batch(batch: &CommittedBatch, last_row: usize) {
    info!(
        batch = batch.batch_number,
        size = batch.size,
        last_row = last_row,
        "Uploaded batch ending at row {}",
        last_row
    );
}
