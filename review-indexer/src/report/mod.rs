//! Aggregations over reviews read back from the store.
//!
//! `ReviewSummary` carries the figures a dashboard needs: overall averages, the
//! sentiment split, per-product rollups, a daily trend and the most frequent
//! terms for a word cloud. Reviews with missing ratings, sentiment or dates are
//! left out of the figures that need those values and counted everywhere else.

mod terms;

pub use terms::{tokenize, top_terms, TermCount, MAX_TOP_TERMS};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use review_indexer_shared::{SentimentLabel, StoredReview};

/// Number of reviews per sentiment label.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentDistribution {
    fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductSummary {
    pub product_id: String,
    pub review_count: usize,
    pub average_rating: Option<f64>,
    pub average_compound: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub review_count: usize,
    pub average_compound: Option<f64>,
}

/// Summary statistics for a set of reviews.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewSummary {
    pub total_reviews: usize,
    /// Mean over reviews that have a rating.
    pub average_rating: Option<f64>,
    /// Mean compound score over reviews that have sentiment.
    pub average_compound: Option<f64>,
    pub sentiment_distribution: SentimentDistribution,
    /// Sorted by product id.
    pub products: Vec<ProductSummary>,
    /// Dated reviews only, oldest day first.
    pub daily_trend: Vec<DailySentiment>,
    pub top_terms: Vec<TermCount>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Default)]
struct Rollup {
    count: usize,
    rating: Mean,
    compound: Mean,
}

impl ReviewSummary {
    /// Aggregate `reviews`.
    pub fn from_reviews(reviews: &[StoredReview]) -> Self {
        let mut rating = Mean::default();
        let mut compound = Mean::default();
        let mut distribution = SentimentDistribution::default();
        let mut products: BTreeMap<&str, Rollup> = BTreeMap::new();
        let mut days: BTreeMap<NaiveDate, Rollup> = BTreeMap::new();

        for review in reviews {
            let review_compound = review.compound();

            rating.push(review.rating);
            compound.push(review_compound);
            if let Some(sentiment) = &review.sentiment {
                distribution.record(sentiment.label());
            }

            let product = products.entry(review.product_id.as_str()).or_default();
            product.count += 1;
            product.rating.push(review.rating);
            product.compound.push(review_compound);

            if let Some(date) = review.date {
                let day = days.entry(date.date_naive()).or_default();
                day.count += 1;
                day.compound.push(review_compound);
            }
        }

        Self {
            total_reviews: reviews.len(),
            average_rating: rating.value(),
            average_compound: compound.value(),
            sentiment_distribution: distribution,
            products: products
                .into_iter()
                .map(|(product_id, rollup)| ProductSummary {
                    product_id: product_id.to_string(),
                    review_count: rollup.count,
                    average_rating: rollup.rating.value(),
                    average_compound: rollup.compound.value(),
                })
                .collect(),
            daily_trend: days
                .into_iter()
                .map(|(date, rollup)| DailySentiment {
                    date,
                    review_count: rollup.count,
                    average_compound: rollup.compound.value(),
                })
                .collect(),
            top_terms: top_terms(
                reviews.iter().map(|review| review.review_text.as_str()),
                MAX_TOP_TERMS,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_indexer_shared::{parse_review_date, StoredSentiment};

    fn review(
        id: &str,
        product: &str,
        rating: Option<f64>,
        date: &str,
        compound: Option<f64>,
        text: &str,
    ) -> StoredReview {
        StoredReview {
            review_id: id.to_string(),
            product_id: product.to_string(),
            review_text: text.to_string(),
            rating,
            date: parse_review_date(date),
            sentiment: compound.map(StoredSentiment::Compound),
        }
    }

    fn approx(value: Option<f64>, expected: f64) -> bool {
        value.is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_summary_figures() {
        let reviews = vec![
            review("r1", "p2", Some(5.0), "2024-01-01", Some(0.8), "great battery"),
            review("r2", "p1", Some(1.0), "2024-01-01", Some(-0.6), "battery died"),
            review("r3", "p1", None, "2024-01-03", Some(0.0), "arrived"),
            review("r4", "p1", Some(3.0), "not a date", None, ""),
        ];

        let summary = ReviewSummary::from_reviews(&reviews);

        assert_eq!(summary.total_reviews, 4);
        assert!(approx(summary.average_rating, 3.0));
        assert!(approx(summary.average_compound, 0.2 / 3.0));
        assert_eq!(
            summary.sentiment_distribution,
            SentimentDistribution {
                positive: 1,
                neutral: 1,
                negative: 1
            }
        );

        let product_ids: Vec<_> = summary.products.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(product_ids, vec!["p1", "p2"]);
        assert_eq!(summary.products[0].review_count, 3);
        assert!(approx(summary.products[0].average_rating, 2.0));
        assert!(approx(summary.products[0].average_compound, -0.3));

        assert_eq!(summary.daily_trend.len(), 2);
        assert_eq!(summary.daily_trend[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(summary.daily_trend[0].review_count, 2);
        assert!(approx(summary.daily_trend[0].average_compound, 0.1));

        assert_eq!(summary.top_terms[0], TermCount { term: "battery".into(), count: 2 });
    }

    #[test]
    fn test_empty_summary() {
        let summary = ReviewSummary::from_reviews(&[]);

        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.average_rating, None);
        assert_eq!(summary.average_compound, None);
        assert!(summary.products.is_empty());
        assert!(summary.daily_trend.is_empty());
        assert!(summary.top_terms.is_empty());
    }

    #[test]
    fn test_summary_serializes_dates_as_days() {
        let reviews = vec![review("r1", "p1", Some(4.0), "03/15/2024", Some(0.5), "nice")];
        let json = serde_json::to_value(ReviewSummary::from_reviews(&reviews)).unwrap();

        assert_eq!(json["daily_trend"][0]["date"], "2024-03-15");
        assert_eq!(json["sentiment_distribution"]["positive"], 1);
    }
}
