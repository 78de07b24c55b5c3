//! Dependency initialization and wiring for the review indexer.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::loader::{LoaderConfig, ReviewLoader};
use crate::orchestrator::Orchestrator;
use crate::processor::ReviewProcessor;
use crate::IndexingError;
use review_indexer_repository::firestore::{DEFAULT_COLLECTION, MAX_WRITES_PER_COMMIT};
use review_indexer_repository::{
    BootstrapSettings, InMemoryReviewStore, ReviewStoreProvider, StoreBootstrap,
};

/// Default CSV path when none is given.
const DEFAULT_CSV_PATH: &str = "reviews.csv";

/// Where reviews are written to and read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// The Firestore collection (or its emulator).
    Firestore,
    /// A process-local store, for dry runs.
    Memory,
}

impl StoreBackend {
    /// Parse the backend from `REVIEW_STORE_BACKEND`.
    ///
    /// Valid values: "firestore" or "memory" (case-insensitive).
    /// Defaults to "firestore" if not set or invalid.
    pub fn from_env() -> Self {
        match env::var("REVIEW_STORE_BACKEND") {
            Ok(value) => Self::parse(&value).unwrap_or_else(|| {
                warn!(value = %value, "Invalid REVIEW_STORE_BACKEND, defaulting to 'firestore'");
                Self::Firestore
            }),
            Err(_) => Self::Firestore,
        }
    }

    /// Reject backends that cannot hold data written by another process.
    ///
    /// A reader on the memory backend would only ever see an empty store.
    pub fn require_persistent(self) -> Result<Self, IndexingError> {
        match self {
            Self::Firestore => Ok(self),
            Self::Memory => Err(IndexingError::config(
                "the memory backend starts empty in every process; set REVIEW_STORE_BACKEND=firestore to read reviews",
            )),
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "firestore" => Some(Self::Firestore),
            "memory" | "in-memory" | "in_memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Settings for one ingest run.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub source_path: PathBuf,
    pub collection: String,
    pub backend: StoreBackend,
    pub batch_size: usize,
}

impl IngestSettings {
    /// Read settings from the command line and environment.
    ///
    /// # Environment Variables
    ///
    /// - `REVIEWS_CSV_PATH`: CSV path when no argument is given (default: reviews.csv)
    /// - `REVIEWS_COLLECTION`: Target collection (default: "reviews")
    /// - `REVIEW_STORE_BACKEND`: "firestore" or "memory" (default: firestore)
    /// - `INGEST_BATCH_SIZE`: Documents per commit (default and maximum: 500)
    pub fn from_env() -> Self {
        let source_path = env::args()
            .nth(1)
            .or_else(|| env::var("REVIEWS_CSV_PATH").ok())
            .unwrap_or_else(|| DEFAULT_CSV_PATH.to_string());
        let batch_size = env::var("INGEST_BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_WRITES_PER_COMMIT);

        Self {
            source_path: PathBuf::from(source_path),
            collection: collection_from_env(),
            backend: StoreBackend::from_env(),
            batch_size,
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// CSV file to ingest.
    pub source_path: PathBuf,
    /// The store the orchestrator writes to.
    pub store: Arc<dyn ReviewStoreProvider>,
}

impl Dependencies {
    /// Initialize all dependencies from the command line and environment.
    pub async fn new() -> Result<Self, IndexingError> {
        Self::from_settings(IngestSettings::from_env()).await
    }

    /// Initialize all dependencies from explicit settings.
    pub async fn from_settings(settings: IngestSettings) -> Result<Self, IndexingError> {
        info!(
            source_path = %settings.source_path.display(),
            collection = %settings.collection,
            backend = ?settings.backend,
            batch_size = settings.batch_size,
            "Initializing dependencies"
        );

        let store = connect_store(settings.backend, &settings.collection).await?;

        let processor = ReviewProcessor::new();
        let loader = ReviewLoader::with_config(store.clone(), LoaderConfig::new(settings.batch_size));
        let orchestrator = Orchestrator::new(processor, loader);

        Ok(Self {
            orchestrator,
            source_path: settings.source_path,
            store,
        })
    }
}

/// Target collection from `REVIEWS_COLLECTION`.
pub fn collection_from_env() -> String {
    env::var("REVIEWS_COLLECTION").unwrap_or_else(|_| DEFAULT_COLLECTION.to_string())
}

/// Build the review store for `backend`.
///
/// The Firestore handle comes from the process-wide bootstrap, so calling this
/// more than once reuses the same authenticated client.
pub async fn connect_store(
    backend: StoreBackend,
    collection: &str,
) -> Result<Arc<dyn ReviewStoreProvider>, IndexingError> {
    match backend {
        StoreBackend::Firestore => {
            let settings = BootstrapSettings::from_env(Some(collection.to_string()));
            let provider = StoreBootstrap::global().get_or_init(&settings).await?;
            info!("Firestore connection established");
            Ok(provider)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory review store, nothing will be persisted");
            Ok(Arc::new(InMemoryReviewStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::CsvReviewSource;

    #[test]
    fn test_parse_backend() {
        assert_eq!(StoreBackend::parse("firestore"), Some(StoreBackend::Firestore));
        assert_eq!(StoreBackend::parse(" MEMORY "), Some(StoreBackend::Memory));
        assert_eq!(StoreBackend::parse("in-memory"), Some(StoreBackend::Memory));
        assert_eq!(StoreBackend::parse("postgres"), None);
    }

    #[test]
    fn test_readers_require_persistent_backend() {
        assert_eq!(
            StoreBackend::Firestore.require_persistent().unwrap(),
            StoreBackend::Firestore
        );

        let err = StoreBackend::Memory.require_persistent().unwrap_err();
        assert!(matches!(err, IndexingError::ConfigError(_)));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_memory_backend_wiring() {
        let settings = IngestSettings {
            source_path: PathBuf::from("reviews.csv"),
            collection: "reviews".to_string(),
            backend: StoreBackend::Memory,
            batch_size: 2,
        };

        let mut deps = Dependencies::from_settings(settings).await.unwrap();
        let data = "review_id,product_id,review_text,rating,date\n\
                    r1,p1,Good,5,2024-01-01\n\
                    r2,p1,Bad,1,2024-01-02\n\
                    r3,p2,Fine,3,2024-01-03\n";

        let source = CsvReviewSource::from_reader(data.as_bytes()).unwrap();
        let report = deps.orchestrator.run(source).await.unwrap();

        assert_eq!(report.rows_processed, 3);
        assert_eq!(report.batches_committed, 2);
        assert!(deps.store.get_review("r3").await.unwrap().is_some());
    }
}
