//! Consumer module for the review ingest.
//!
//! Reads review rows from a CSV source.

mod csv_source;
mod messages;

pub use csv_source::{validate_headers, CsvReviewSource};
pub use messages::{ReviewRecord, SourceRow, REQUIRED_COLUMNS};
