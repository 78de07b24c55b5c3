//! Error types for the review indexer repository.
//!
//! Store operations fail with `ReviewStoreError`. Resolving credentials and
//! building the authenticated client fail with `CredentialError`.

mod credential_error;
mod review_store_error;

pub use credential_error::CredentialError;
pub use review_store_error::ReviewStoreError;
