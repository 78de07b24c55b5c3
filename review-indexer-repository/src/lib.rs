//! # Review Indexer Repository
//!
//! This crate provides traits and implementations for reading and writing the
//! review collection. It includes definitions for errors, the store interface,
//! a Firestore implementation, an in-memory implementation, and the credential
//! bootstrap that produces the authenticated Firestore handle.

pub mod bootstrap;
pub mod credentials;
pub mod errors;
pub mod firestore;
pub mod interfaces;
pub mod memory;
pub mod types;
pub mod utils;

pub use bootstrap::{BootstrapSettings, StoreBootstrap};
pub use credentials::{ResolvedCredential, ServiceAccountKey, ServiceAccountSecret};
pub use errors::{CredentialError, ReviewStoreError};
pub use firestore::{FirestoreConfig, FirestoreProvider};
pub use interfaces::ReviewStoreProvider;
pub use memory::InMemoryReviewStore;
pub use types::BatchCommitSummary;
pub use utils::validate_document_id;
