//! Read-side view of a stored review.
//!
//! Documents read back from the collection are not guaranteed to match the
//! current write format. Older documents carry the sentiment as a bare compound
//! number, and dates are free-form strings. `StoredReview` decodes whatever is
//! there and turns unusable values into `None` instead of failing the read.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::types::review_document::ReviewDocument;
use crate::types::sentiment::{SentimentLabel, SentimentScores};

/// Datetime layouts accepted for the `date` field, tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Date-only layouts accepted for the `date` field.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Sentiment as found in the store: the nested record or a legacy bare compound.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StoredSentiment {
    Scores(SentimentScores),
    Compound(f64),
}

impl StoredSentiment {
    /// Compound polarity regardless of the stored shape.
    pub fn compound(&self) -> f64 {
        match self {
            Self::Scores(scores) => scores.compound,
            Self::Compound(compound) => *compound,
        }
    }

    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::from_compound(self.compound())
    }
}

/// A review as read back from the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredReview {
    #[serde(default, deserialize_with = "lenient_text")]
    pub review_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub product_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub review_text: String,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_sentiment")]
    pub sentiment: Option<StoredSentiment>,
}

impl StoredReview {
    /// Fill in `review_id` from the document key when the body lacks one.
    pub fn with_document_key(mut self, key: &str) -> Self {
        if self.review_id.is_empty() {
            self.review_id = key.to_string();
        }
        self
    }

    /// Compound polarity, if the review carries any sentiment.
    pub fn compound(&self) -> Option<f64> {
        self.sentiment.as_ref().map(StoredSentiment::compound)
    }
}

impl From<ReviewDocument> for StoredReview {
    fn from(doc: ReviewDocument) -> Self {
        let date = parse_review_date(&doc.date);
        Self {
            review_id: doc.review_id,
            product_id: doc.product_id,
            review_text: doc.review_text,
            rating: Some(doc.rating),
            date,
            sentiment: Some(StoredSentiment::Scores(doc.sentiment)),
        }
    }
}

/// Parse a review date in any of the accepted layouts.
///
/// Returns `None` for anything unparseable. Date-only values are taken as
/// midnight UTC.
pub fn parse_review_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, format) {
            return parsed.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// Any scalar that may show up in a loosely typed field.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// A value of the expected shape, or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose<T> {
    Known(T),
    Other(IgnoredAny),
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LooseScalar::deserialize(deserializer)? {
        LooseScalar::Text(text) => text,
        LooseScalar::Number(number) => number.to_string(),
        LooseScalar::Other(_) => String::new(),
    })
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let rating = match LooseScalar::deserialize(deserializer)? {
        LooseScalar::Number(number) => Some(number),
        LooseScalar::Text(text) => text.trim().parse::<f64>().ok(),
        LooseScalar::Other(_) => None,
    };
    Ok(rating.filter(|r| r.is_finite()))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LooseScalar::deserialize(deserializer)? {
        LooseScalar::Text(text) => parse_review_date(&text),
        _ => None,
    })
}

fn lenient_sentiment<'de, D>(deserializer: D) -> Result<Option<StoredSentiment>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::<StoredSentiment>::deserialize(deserializer)? {
        Loose::Known(sentiment) => Some(sentiment),
        Loose::Other(_) => None,
    })
}
