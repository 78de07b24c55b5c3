//! One-time construction of the authenticated Firestore handle.
//!
//! `StoreBootstrap` owns a `OnceCell`. The first successful `get_or_init`
//! resolves the secret, builds the provider and verifies the credentials.
//! Every later call returns the same `Arc`, so a process never registers a
//! second client. A failed attempt leaves the cell empty.

use std::sync::{Arc, OnceLock};

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::credentials::{
    self, project_id_override_from_env, ResolvedCredential, ServiceAccountSecret,
    SERVICE_ACCOUNT_ENV,
};
use crate::errors::{CredentialError, ReviewStoreError};
use crate::firestore::{
    FirestoreConfig, FirestoreEndpoint, FirestoreProvider, DEFAULT_COLLECTION, DEFAULT_DATABASE_ID,
};
use crate::interfaces::ReviewStoreProvider;

/// Inputs for building the Firestore handle.
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    /// Service-account secret. Only optional against the emulator.
    pub secret: Option<ServiceAccountSecret>,
    /// Project id used when the credential has none.
    pub project_id_override: Option<String>,
    pub endpoint: FirestoreEndpoint,
    pub database_id: String,
    pub collection: String,
}

impl BootstrapSettings {
    /// Settings for a secret on the production endpoint.
    pub fn new(secret: ServiceAccountSecret, collection: impl Into<String>) -> Self {
        Self {
            secret: Some(secret),
            project_id_override: None,
            endpoint: FirestoreEndpoint::Production,
            database_id: DEFAULT_DATABASE_ID.to_string(),
            collection: collection.into(),
        }
    }

    /// Read the secret, project fallback and emulator host from the environment.
    ///
    /// A missing secret is not an error here; it surfaces from
    /// `resolve_credential` so the emulator can run without one.
    pub fn from_env(collection: Option<String>) -> Self {
        Self {
            secret: ServiceAccountSecret::from_env().ok(),
            project_id_override: project_id_override_from_env(),
            endpoint: FirestoreEndpoint::from_env(),
            database_id: DEFAULT_DATABASE_ID.to_string(),
            collection: collection.unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        }
    }

    pub fn with_project_id_override(mut self, project_id: impl Into<String>) -> Self {
        self.project_id_override = Some(project_id.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: FirestoreEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Parse the secret and settle on a project id.
    pub fn resolve_credential(&self) -> Result<ResolvedCredential, CredentialError> {
        let env_override = self.project_id_override.as_deref();
        match &self.secret {
            Some(secret) => ResolvedCredential::resolve(secret, env_override),
            None if self.endpoint.is_emulator() => Ok(ResolvedCredential {
                key: None,
                project_id: credentials::resolve_project_id(None, env_override)?,
            }),
            None => Err(CredentialError::missing_secret(SERVICE_ACCOUNT_ENV)),
        }
    }

    fn firestore_config(&self, project_id: &str) -> FirestoreConfig {
        FirestoreConfig::new(project_id, self.collection.clone())
            .with_database(self.database_id.clone())
            .with_endpoint(self.endpoint.clone())
    }
}

/// Lazily-initialized, shared Firestore handle.
#[derive(Default)]
pub struct StoreBootstrap {
    handle: OnceCell<Arc<FirestoreProvider>>,
}

impl StoreBootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide bootstrap instance.
    pub fn global() -> &'static StoreBootstrap {
        static GLOBAL: OnceLock<StoreBootstrap> = OnceLock::new();
        GLOBAL.get_or_init(StoreBootstrap::new)
    }

    /// Return the handle, building it on first use.
    ///
    /// Settings passed after the first successful call are ignored.
    pub async fn get_or_init(
        &self,
        settings: &BootstrapSettings,
    ) -> Result<Arc<FirestoreProvider>, CredentialError> {
        if let Some(handle) = self.handle.get() {
            debug!("Reusing existing Firestore handle");
            return Ok(Arc::clone(handle));
        }

        self.handle
            .get_or_try_init(|| async {
                let credential = settings.resolve_credential()?;
                let provider = FirestoreProvider::new(
                    settings.firestore_config(&credential.project_id),
                    &credential,
                )?;
                provider
                    .check_ready()
                    .await
                    .map_err(|e: ReviewStoreError| CredentialError::client_init(e.to_string()))?;

                info!(
                    project_id = %credential.project_id,
                    collection = %settings.collection,
                    "Connected to Firestore successfully"
                );
                Ok(Arc::new(provider))
            })
            .await
            .cloned()
    }

    /// The handle, if it has been built.
    pub fn get(&self) -> Option<Arc<FirestoreProvider>> {
        self.handle.get().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emulator_settings(collection: &str) -> BootstrapSettings {
        BootstrapSettings {
            secret: None,
            project_id_override: Some("demo-reviews".to_string()),
            endpoint: FirestoreEndpoint::Emulator {
                host: "localhost:8080".to_string(),
            },
            database_id: DEFAULT_DATABASE_ID.to_string(),
            collection: collection.to_string(),
        }
    }

    #[tokio::test]
    async fn test_second_call_reuses_handle() {
        let bootstrap = StoreBootstrap::new();
        assert!(bootstrap.get().is_none());

        let first = bootstrap.get_or_init(&emulator_settings("reviews")).await.unwrap();
        let second = bootstrap.get_or_init(&emulator_settings("other")).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.config().collection, "reviews");
        assert!(bootstrap.get().is_some());
    }

    #[tokio::test]
    async fn test_failed_init_leaves_cell_empty() {
        let bootstrap = StoreBootstrap::new();
        let mut settings = emulator_settings("reviews");
        settings.endpoint = FirestoreEndpoint::Production;

        let result = bootstrap.get_or_init(&settings).await;
        assert!(matches!(result, Err(CredentialError::MissingSecret { .. })));
        assert!(bootstrap.get().is_none());

        let handle = bootstrap.get_or_init(&emulator_settings("reviews")).await;
        assert!(handle.is_ok());
    }

    #[test]
    fn test_emulator_without_project_fails() {
        let mut settings = emulator_settings("reviews");
        settings.project_id_override = None;

        match settings.resolve_credential() {
            Err(CredentialError::MissingProjectId { available_keys }) => {
                assert!(available_keys.is_empty())
            }
            other => panic!("expected MissingProjectId, got {:?}", other),
        }
    }

    #[test]
    fn test_secret_takes_priority_over_override() {
        let secret = ServiceAccountSecret::from(r#"{"project_id": "from-secret"}"#.to_string());
        let settings = BootstrapSettings::new(secret, "reviews").with_project_id_override("from-env");

        let credential = settings.resolve_credential().unwrap();
        assert_eq!(credential.project_id, "from-secret");
    }

    #[test]
    fn test_global_is_a_single_instance() {
        assert!(std::ptr::eq(StoreBootstrap::global(), StoreBootstrap::global()));
    }
}
