//! CSV implementation of the review source.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{DeserializeRecordsIntoIter, ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::consumer::messages::{ReviewRecord, SourceRow, REQUIRED_COLUMNS};
use crate::errors::IngestError;

/// Streams review rows from a CSV source with a header row.
///
/// Headers are checked when the source is opened, so a source missing a
/// required column fails before any row is produced. Rows are then yielded
/// lazily in file order.
pub struct CsvReviewSource<R: Read> {
    records: DeserializeRecordsIntoIter<R, ReviewRecord>,
    rows_read: usize,
}

impl CsvReviewSource<File> {
    /// Open a CSV file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => IngestError::SourceNotFound(path.display().to_string()),
            _ => IngestError::source_error(format!("Failed to open {}: {}", path.display(), e)),
        })?;

        info!(path = %path.display(), "Opened review source");
        Self::from_reader(file)
    }
}

impl<R: Read> CsvReviewSource<R> {
    /// Read CSV data from any reader.
    pub fn from_reader(reader: R) -> Result<Self, IngestError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        validate_headers(&headers)?;
        debug!(columns = headers.len(), "Source headers validated");

        Ok(Self {
            records: reader.into_deserialize(),
            rows_read: 0,
        })
    }

    /// Number of data rows produced so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }
}

impl<R: Read> Iterator for CsvReviewSource<R> {
    type Item = Result<SourceRow, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.records.next()?;
        self.rows_read += 1;
        let row_number = self.rows_read;

        Some(
            result
                .map(|record| SourceRow { row_number, record })
                .map_err(|e| IngestError::invalid_row(row_number, e.to_string())),
        )
    }
}

/// Check the header row for every required column.
///
/// Reports the first missing column in `REQUIRED_COLUMNS` order.
pub fn validate_headers(headers: &StringRecord) -> Result<(), IngestError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(IngestError::missing_column(column));
        }
    }
    Ok(())
}
