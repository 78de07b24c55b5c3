//! Sentiment scoring for review text.

use once_cell::sync::Lazy;
use review_indexer_shared::SentimentScores;
use vader_sentiment::SentimentIntensityAnalyzer;

// Lexicon and rule tables are built once and shared read-only.
static ANALYZER: Lazy<SentimentIntensityAnalyzer<'static>> =
    Lazy::new(SentimentIntensityAnalyzer::new);

/// Computes sentiment scores for a piece of review text.
pub trait SentimentScorer: Send + Sync {
    /// Score `text`. Missing or blank text must score as
    /// [`SentimentScores::NEUTRAL`].
    fn score(&self, text: Option<&str>) -> SentimentScores;
}

/// Lexicon and rule based scorer backed by VADER.
#[derive(Debug, Default, Clone, Copy)]
pub struct VaderSentimentScorer;

impl VaderSentimentScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for VaderSentimentScorer {
    fn score(&self, text: Option<&str>) -> SentimentScores {
        let text = match text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return SentimentScores::NEUTRAL,
        };

        let scores = ANALYZER.polarity_scores(text);
        let component = |key: &str| scores.get(key).copied().unwrap_or(0.0);

        let (neg, neu, pos) = (component("neg"), component("neu"), component("pos"));

        // No scorable token (punctuation, a lone letter) yields all zeros
        if neg + neu + pos == 0.0 {
            return SentimentScores::NEUTRAL;
        }

        SentimentScores::new(neg, neu, pos, component("compound"))
    }
}
