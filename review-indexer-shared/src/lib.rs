//! # Review Indexer Shared
//!
//! This crate defines the data structures shared by the review ingestion job and
//! the query side. It includes the document written for every review, the
//! sentiment scores attached to it, and the tolerant read form used when the
//! collection is queried back.

pub mod types;

pub use types::review_document::ReviewDocument;
pub use types::review_query::{ReviewQuery, DEFAULT_QUERY_LIMIT};
pub use types::sentiment::{SentimentLabel, SentimentScores};
pub use types::stored_review::{parse_review_date, StoredReview, StoredSentiment};
