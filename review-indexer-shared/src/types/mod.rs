//! This module defines the core data structures used across the review indexer.
//! It re-exports the document, query and sentiment types.

pub mod review_document;
pub mod review_query;
pub mod sentiment;
pub mod stored_review;

pub use review_document::ReviewDocument;
pub use review_query::ReviewQuery;
pub use sentiment::{SentimentLabel, SentimentScores};
pub use stored_review::{StoredReview, StoredSentiment};
