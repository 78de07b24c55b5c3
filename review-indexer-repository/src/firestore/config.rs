//! Firestore endpoint and collection configuration.
//!
//! This module builds every REST URL and document name the provider uses, so
//! the provider itself never concatenates paths.

use std::env;
use url::Url;

use crate::errors::ReviewStoreError;

/// Production REST root.
pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Database used unless configured otherwise.
pub const DEFAULT_DATABASE_ID: &str = "(default)";

/// Collection used unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "reviews";

/// Environment variable pointing the client at a local emulator (`host:port`).
pub const EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";

/// OAuth scope required for document reads and writes.
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Where Firestore requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirestoreEndpoint {
    /// Google's production endpoint, authenticated with a service account.
    Production,
    /// A local emulator. Requests go over plain HTTP and skip OAuth.
    Emulator { host: String },
}

impl FirestoreEndpoint {
    /// Use the emulator when `FIRESTORE_EMULATOR_HOST` is set and non-empty.
    pub fn from_env() -> Self {
        match env::var(EMULATOR_HOST_ENV) {
            Ok(host) if !host.trim().is_empty() => Self::Emulator {
                host: host.trim().to_string(),
            },
            _ => Self::Production,
        }
    }

    pub fn is_emulator(&self) -> bool {
        matches!(self, Self::Emulator { .. })
    }

    /// REST root for this endpoint.
    pub fn base_url(&self) -> Result<Url, ReviewStoreError> {
        let raw = match self {
            Self::Production => FIRESTORE_BASE_URL.to_string(),
            Self::Emulator { host } => format!("http://{}/v1", host),
        };
        Url::parse(&raw).map_err(|e| ReviewStoreError::connection(format!("{}: {}", raw, e)))
    }
}

/// Configuration for the Firestore provider.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// GCP project that owns the database.
    pub project_id: String,
    /// Database id, usually `(default)`.
    pub database_id: String,
    /// Collection holding the review documents.
    pub collection: String,
    pub endpoint: FirestoreEndpoint,
}

impl FirestoreConfig {
    /// Create a configuration for the default database on the production endpoint.
    pub fn new(project_id: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: DEFAULT_DATABASE_ID.to_string(),
            collection: collection.into(),
            endpoint: FirestoreEndpoint::Production,
        }
    }

    pub fn with_database(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: FirestoreEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// `projects/{project}/databases/{database}/documents`
    pub fn documents_path(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }

    /// Full resource name of a review document, as used in write bodies.
    pub fn document_name(&self, review_id: &str) -> String {
        format!("{}/{}/{}", self.documents_path(), self.collection, review_id)
    }

    /// URL of the atomic batch write endpoint.
    pub fn commit_url(&self) -> Result<Url, ReviewStoreError> {
        self.database_url(&["documents:commit"])
    }

    /// URL of the structured query endpoint.
    pub fn run_query_url(&self) -> Result<Url, ReviewStoreError> {
        self.database_url(&["documents:runQuery"])
    }

    /// URL of a single review document. The id is percent-encoded as a path segment.
    pub fn document_url(&self, review_id: &str) -> Result<Url, ReviewStoreError> {
        self.database_url(&["documents", &self.collection, review_id])
    }

    fn database_url(&self, tail: &[&str]) -> Result<Url, ReviewStoreError> {
        let mut url = self.endpoint.base_url()?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ReviewStoreError::connection("Firestore base URL cannot hold a path"))?;
            segments.extend(["projects", self.project_id.as_str()]);
            segments.extend(["databases", self.database_id.as_str()]);
            segments.extend(tail.iter().copied());
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_name() {
        let config = FirestoreConfig::new("reviews-prod", "reviews");
        assert_eq!(
            config.document_name("r1"),
            "projects/reviews-prod/databases/(default)/documents/reviews/r1"
        );
    }

    #[test]
    fn test_production_urls() {
        let config = FirestoreConfig::new("reviews-prod", "reviews");

        assert_eq!(
            config.commit_url().unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/reviews-prod/databases/(default)/documents:commit"
        );
        assert_eq!(
            config.run_query_url().unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/reviews-prod/databases/(default)/documents:runQuery"
        );
    }

    #[test]
    fn test_document_url_encodes_id() {
        let config = FirestoreConfig::new("p", "reviews").with_database("analytics");
        let url = config.document_url("id with space").unwrap();
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/p/databases/analytics/documents/reviews/id%20with%20space"
        );
    }

    #[test]
    fn test_emulator_urls() {
        let config = FirestoreConfig::new("demo", "reviews").with_endpoint(
            FirestoreEndpoint::Emulator {
                host: "localhost:8080".to_string(),
            },
        );

        assert!(config.endpoint.is_emulator());
        assert_eq!(
            config.commit_url().unwrap().as_str(),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents:commit"
        );
    }
}
