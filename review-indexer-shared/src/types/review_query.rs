//! Query parameters for reading reviews back from the store.

use serde::{Deserialize, Serialize};

/// Default maximum number of reviews returned by a query.
pub const DEFAULT_QUERY_LIMIT: usize = 1000;

/// Filter applied when reading the review collection.
///
/// All filters are optional. `limit` caps the number of returned documents.
/// Under a `min_rating` filter the lowest-rated matches are kept first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewQuery {
    /// Only return reviews for this product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    /// Only return reviews with `rating >= min_rating`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,

    /// Maximum number of results.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_QUERY_LIMIT
}

impl Default for ReviewQuery {
    fn default() -> Self {
        Self {
            product_id: None,
            min_rating: None,
            limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

impl ReviewQuery {
    /// Query every review, up to the default limit.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict the query to one product.
    pub fn for_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Require a minimum rating.
    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    /// Cap the number of results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Check a review's product and rating against this query's filters.
    ///
    /// A review without a rating never satisfies a `min_rating` filter.
    pub fn matches(&self, product_id: &str, rating: Option<f64>) -> bool {
        if let Some(ref wanted) = self.product_id {
            if wanted != product_id {
                return false;
            }
        }
        match (self.min_rating, rating) {
            (Some(min), Some(rating)) => rating >= min,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let query = ReviewQuery::all();
        assert!(query.product_id.is_none());
        assert!(query.min_rating.is_none());
        assert_eq!(query.limit, DEFAULT_QUERY_LIMIT);
        assert!(query.matches("anything", None));
    }

    #[test]
    fn test_matches_product_and_rating() {
        let query = ReviewQuery::all().for_product("p1").with_min_rating(2.0);

        assert!(query.matches("p1", Some(5.0)));
        assert!(query.matches("p1", Some(2.0)));
        assert!(!query.matches("p1", Some(1.0)));
        assert!(!query.matches("p2", Some(5.0)));
        assert!(!query.matches("p1", None));
    }

    #[test]
    fn test_deserialize_uses_default_limit() {
        let query: ReviewQuery = serde_json::from_str(r#"{"product_id":"p9"}"#).unwrap();
        assert_eq!(query.product_id.as_deref(), Some("p9"));
        assert_eq!(query.limit, DEFAULT_QUERY_LIMIT);
    }
}
