//! Processor module for the review ingest.
//!
//! Transforms source rows into review documents with sentiment scores.

mod review_processor;
pub mod sentiment;

pub use review_processor::ReviewProcessor;
pub use sentiment::{SentimentScorer, VaderSentimentScorer};
