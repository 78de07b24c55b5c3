//! Configuration and dependency initialization.

mod dependencies;

pub use dependencies::{
    collection_from_env, connect_store, Dependencies, IngestSettings, StoreBackend,
};
