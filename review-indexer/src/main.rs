//! Review Indexer Main Entry Point
//!
//! Reads a CSV of product reviews, scores each review's sentiment and writes
//! the results into the review collection.

use dotenv::dotenv;
use review_indexer::consumer::CsvReviewSource;
use review_indexer::{Dependencies, IndexingError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), IndexingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("review_indexer=info,review_indexer_repository=info"));

    let json_output = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "review-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "review-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting review indexer");

    let mut deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, fatal = e.is_fatal(), "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let source = match CsvReviewSource::open(&deps.source_path) {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, path = %deps.source_path.display(), "Failed to open review source");
            return Err(e.into());
        }
    };

    match deps.orchestrator.run(source).await {
        Ok(report) => {
            info!(
                rows_processed = report.rows_processed,
                batches_committed = report.batches_committed,
                "Review indexer completed successfully"
            );
            Ok(())
        }
        Err(e) => {
            let e = IndexingError::from(e);
            error!(error = %e, fatal = e.is_fatal(), "Review indexer failed");
            Err(e)
        }
    }
}
