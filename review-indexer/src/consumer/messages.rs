//! Row types produced by the review source.

use serde::Deserialize;

/// Columns every review source must provide, in the order they are checked.
pub const REQUIRED_COLUMNS: [&str; 5] = ["review_id", "product_id", "review_text", "rating", "date"];

/// The required columns of one CSV record, as raw text.
///
/// Extra columns in the source are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReviewRecord {
    pub review_id: String,
    pub product_id: String,
    pub review_text: String,
    pub rating: String,
    pub date: String,
}

/// A data row together with its position in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// 1-based data row number (the header row is not counted).
    pub row_number: usize,
    pub record: ReviewRecord,
}
