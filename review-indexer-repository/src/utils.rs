//! Utility functions for the review indexer repository.

use crate::errors::ReviewStoreError;

/// Longest document id Firestore accepts, in bytes.
pub const MAX_DOCUMENT_ID_BYTES: usize = 1500;

/// Validate a review id for use as a document key.
///
/// Firestore rejects ids that are empty, contain `/`, are exactly `.` or `..`,
/// match `__.*__`, or exceed 1500 bytes. The in-memory store applies the same
/// rules so both backends fail on the same input.
///
/// # Example
///
/// ```
/// use review_indexer_repository::validate_document_id;
///
/// assert!(validate_document_id("r1").is_ok());
/// assert!(validate_document_id("a/b").is_err());
/// ```
pub fn validate_document_id(review_id: &str) -> Result<(), ReviewStoreError> {
    if review_id.is_empty() {
        return Err(ReviewStoreError::validation("review_id cannot be empty"));
    }

    if review_id.contains('/') {
        return Err(ReviewStoreError::validation(format!(
            "review_id '{}' contains '/'",
            review_id
        )));
    }

    if review_id == "." || review_id == ".." {
        return Err(ReviewStoreError::validation(format!(
            "review_id '{}' is reserved",
            review_id
        )));
    }

    if review_id.len() >= 4 && review_id.starts_with("__") && review_id.ends_with("__") {
        return Err(ReviewStoreError::validation(format!(
            "review_id '{}' matches the reserved pattern __.*__",
            review_id
        )));
    }

    if review_id.len() > MAX_DOCUMENT_ID_BYTES {
        return Err(ReviewStoreError::validation(format!(
            "review_id is {} bytes, maximum is {}",
            review_id.len(),
            MAX_DOCUMENT_ID_BYTES
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_document_id_valid() {
        for id in ["r1", "review-123", "A_b.c", "__x", "1234567890", "___"] {
            assert!(validate_document_id(id).is_ok(), "expected '{}' to be valid", id);
        }
    }

    #[test]
    fn test_validate_document_id_invalid() {
        let too_long = "x".repeat(MAX_DOCUMENT_ID_BYTES + 1);
        for id in ["", "a/b", ".", "..", "____", "__reserved__", too_long.as_str()] {
            let result = validate_document_id(id);
            assert!(
                matches!(result, Err(ReviewStoreError::ValidationError(_))),
                "expected '{}' to be rejected",
                id
            );
        }
    }
}
