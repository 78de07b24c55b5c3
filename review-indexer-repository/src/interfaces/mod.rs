//! Interface definitions for the review store.
//!
//! This module defines the abstract `ReviewStoreProvider` trait that allows
//! for dependency injection and swappable store implementations.

mod review_store_provider;

pub use review_store_provider::ReviewStoreProvider;
