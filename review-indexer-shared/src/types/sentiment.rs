//! Sentiment score types.
//!
//! Scores follow the VADER convention: three proportions (`neg`, `neu`, `pos`)
//! that sum to roughly one, plus a normalized `compound` polarity in [-1, 1].

use serde::{Deserialize, Serialize};

/// Compound score at or above which a review counts as positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound score at or below which a review counts as negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Four-valued sentiment score attached to every stored review.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SentimentScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

impl SentimentScores {
    /// The neutral baseline used for missing or blank text.
    pub const NEUTRAL: SentimentScores = SentimentScores {
        neg: 0.0,
        neu: 1.0,
        pos: 0.0,
        compound: 0.0,
    };

    /// Create a score from its four components.
    pub fn new(neg: f64, neu: f64, pos: f64, compound: f64) -> Self {
        Self {
            neg,
            neu,
            pos,
            compound,
        }
    }

    /// Classify the compound score.
    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::from_compound(self.compound)
    }
}

impl Default for SentimentScores {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Coarse polarity bucket derived from a compound score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Bucket a compound score using the conventional +/-0.05 thresholds.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_baseline() {
        let scores = SentimentScores::default();
        assert_eq!(scores, SentimentScores::new(0.0, 1.0, 0.0, 0.0));
        assert_eq!(scores.label(), SentimentLabel::Neutral);
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(SentimentLabel::from_compound(0.05), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_compound(0.049), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_compound(-0.049), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_compound(-0.05), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_compound(-0.9), SentimentLabel::Negative);
    }

    #[test]
    fn test_serialization_field_names() {
        let json = serde_json::to_value(SentimentScores::new(0.1, 0.6, 0.3, 0.42)).unwrap();
        assert_eq!(json["neg"], 0.1);
        assert_eq!(json["neu"], 0.6);
        assert_eq!(json["pos"], 0.3);
        assert_eq!(json["compound"], 0.42);
    }
}
