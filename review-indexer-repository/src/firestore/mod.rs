//! Firestore implementation of the review store provider.
//!
//! This module provides a concrete implementation of `ReviewStoreProvider`
//! using the Firestore REST API.

pub mod codec;
mod config;
mod provider;

pub use config::{
    FirestoreConfig, FirestoreEndpoint, DATASTORE_SCOPE, DEFAULT_COLLECTION, DEFAULT_DATABASE_ID,
    EMULATOR_HOST_ENV, FIRESTORE_BASE_URL,
};
pub use provider::{FirestoreProvider, MAX_WRITES_PER_COMMIT};
