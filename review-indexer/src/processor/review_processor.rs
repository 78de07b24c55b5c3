//! Review processor implementation.
//!
//! Turns raw source rows into `ReviewDocument`s ready for storage.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::consumer::SourceRow;
use crate::errors::IngestError;
use crate::processor::sentiment::{SentimentScorer, VaderSentimentScorer};
use review_indexer_shared::ReviewDocument;

/// Processor that coerces source rows and attaches sentiment.
///
/// Text columns are copied as-is. The rating is parsed as a number, and a
/// blank or non-numeric rating rejects the row.
pub struct ReviewProcessor {
    scorer: Arc<dyn SentimentScorer>,
}

impl ReviewProcessor {
    /// Create a processor using the VADER scorer.
    pub fn new() -> Self {
        Self::with_scorer(Arc::new(VaderSentimentScorer::new()))
    }

    /// Create a processor with a custom scorer.
    pub fn with_scorer(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }

    /// Process a single source row.
    #[instrument(skip(self, row), fields(row = row.row_number))]
    pub fn process_row(&self, row: SourceRow) -> Result<ReviewDocument, IngestError> {
        let SourceRow { row_number, record } = row;

        let rating = parse_rating(&record.rating)
            .map_err(|reason| IngestError::invalid_row(row_number, reason))?;
        let sentiment = self.scorer.score(Some(&record.review_text));

        debug!(
            review_id = %record.review_id,
            compound = sentiment.compound,
            "Scored review"
        );

        Ok(ReviewDocument::new(
            record.review_id,
            record.product_id,
            record.review_text,
            rating,
            record.date,
            sentiment,
        ))
    }
}

impl Default for ReviewProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_rating(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("rating is empty".to_string());
    }
    match trimmed.parse::<f64>() {
        Ok(rating) if rating.is_finite() => Ok(rating),
        _ => Err(format!("rating '{}' is not a number", trimmed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::ReviewRecord;
    use review_indexer_shared::SentimentScores;

    struct FixedScorer(SentimentScores);

    impl SentimentScorer for FixedScorer {
        fn score(&self, _text: Option<&str>) -> SentimentScores {
            self.0
        }
    }

    fn row(row_number: usize, rating: &str, text: &str) -> SourceRow {
        SourceRow {
            row_number,
            record: ReviewRecord {
                review_id: format!("r{}", row_number),
                product_id: "p1".to_string(),
                review_text: text.to_string(),
                rating: rating.to_string(),
                date: "2024-01-01".to_string(),
            },
        }
    }

    #[test]
    fn test_process_row_copies_fields() {
        let fixed = SentimentScores::new(0.1, 0.6, 0.3, 0.4);
        let processor = ReviewProcessor::with_scorer(Arc::new(FixedScorer(fixed)));

        let doc = processor.process_row(row(1, " 4.5 ", "Nice")).unwrap();

        assert_eq!(doc.review_id, "r1");
        assert_eq!(doc.product_id, "p1");
        assert_eq!(doc.review_text, "Nice");
        assert_eq!(doc.rating, 4.5);
        assert_eq!(doc.date, "2024-01-01");
        assert_eq!(doc.sentiment, fixed);
    }

    #[test]
    fn test_empty_text_is_stored_empty_and_neutral() {
        let processor = ReviewProcessor::new();
        let doc = processor.process_row(row(3, "3", "")).unwrap();

        assert_eq!(doc.review_text, "");
        assert_eq!(doc.sentiment, SentimentScores::NEUTRAL);
    }

    #[test]
    fn test_invalid_ratings_name_the_row() {
        let processor = ReviewProcessor::new();

        for bad in ["", "  ", "abc", "NaN", "inf"] {
            match processor.process_row(row(7, bad, "text")) {
                Err(IngestError::InvalidRow { row, .. }) => assert_eq!(row, 7),
                other => panic!("expected InvalidRow for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_integer_rating_becomes_float() {
        let processor = ReviewProcessor::new();
        let doc = processor.process_row(row(1, "5", "ok")).unwrap();
        assert_eq!(doc.rating, 5.0);
    }
}
