//! Review document written by the ingestion job.
//!
//! This module defines the document structure stored in the review collection.

use serde::{Deserialize, Serialize};

use crate::types::sentiment::SentimentScores;

/// Document representation of a single review.
///
/// One document is produced per source row. The document is keyed by
/// `review_id`, so writing a document whose id already exists replaces the
/// previous one.
///
/// # Fields
///
/// - `review_id`: Unique identifier, used as the document key
/// - `product_id`: Product the review belongs to (not unique)
/// - `review_text`: Free text, may be empty
/// - `rating`: Numeric rating, conventionally 0.0 to 5.0
/// - `date`: Raw date string exactly as read from the source
/// - `sentiment`: Scores computed from `review_text`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewDocument {
    pub review_id: String,
    pub product_id: String,
    pub review_text: String,
    pub rating: f64,
    pub date: String,
    pub sentiment: SentimentScores,
}

impl ReviewDocument {
    /// Create a new review document.
    ///
    /// # Example
    ///
    /// ```
    /// use review_indexer_shared::{ReviewDocument, SentimentScores};
    ///
    /// let doc = ReviewDocument::new(
    ///     "r1",
    ///     "p1",
    ///     "great product",
    ///     5.0,
    ///     "2024-01-01",
    ///     SentimentScores::new(0.0, 0.2, 0.8, 0.62),
    /// );
    /// assert_eq!(doc.document_id(), "r1");
    /// ```
    pub fn new(
        review_id: impl Into<String>,
        product_id: impl Into<String>,
        review_text: impl Into<String>,
        rating: f64,
        date: impl Into<String>,
        sentiment: SentimentScores,
    ) -> Self {
        Self {
            review_id: review_id.into(),
            product_id: product_id.into(),
            review_text: review_text.into(),
            rating,
            date: date.into(),
            sentiment,
        }
    }

    /// The key this document is stored under.
    pub fn document_id(&self) -> &str {
        &self.review_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_document_new() {
        let doc = ReviewDocument::new(
            "r1",
            "p1",
            "great product",
            5.0,
            "2024-01-01",
            SentimentScores::NEUTRAL,
        );

        assert_eq!(doc.review_id, "r1");
        assert_eq!(doc.product_id, "p1");
        assert_eq!(doc.review_text, "great product");
        assert_eq!(doc.rating, 5.0);
        assert_eq!(doc.date, "2024-01-01");
        assert_eq!(doc.document_id(), "r1");
    }

    #[test]
    fn test_serialization_has_all_fields() {
        let doc = ReviewDocument::new("r3", "p2", "", 3.0, "2024-01-03", SentimentScores::NEUTRAL);

        let json = serde_json::to_value(&doc).unwrap();
        let object = json.as_object().unwrap();

        for field in ["review_id", "product_id", "review_text", "rating", "date", "sentiment"] {
            assert!(object.contains_key(field), "missing field {}", field);
        }
        assert_eq!(json["sentiment"]["neu"], 1.0);

        let deserialized: ReviewDocument = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, doc);
    }
}
