//! Firestore provider implementation.
//!
//! This module provides the concrete implementation of `ReviewStoreProvider`
//! on top of the Firestore REST API.

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use review_indexer_shared::{ReviewDocument, ReviewQuery, StoredReview};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::credentials::ResolvedCredential;
use crate::errors::{CredentialError, ReviewStoreError};
use crate::firestore::codec;
use crate::firestore::config::{FirestoreConfig, DATASTORE_SCOPE};
use crate::interfaces::ReviewStoreProvider;
use crate::types::BatchCommitSummary;
use crate::utils;

/// Most writes Firestore accepts in a single commit.
pub const MAX_WRITES_PER_COMMIT: usize = 500;

/// Token the emulator accepts in place of a real OAuth token.
const EMULATOR_TOKEN: &str = "owner";

enum FirestoreAuth {
    ServiceAccount(Arc<CustomServiceAccount>),
    Emulator,
}

/// Firestore provider implementation.
///
/// Writes go through `documents:commit`, which applies every write of a batch
/// atomically. Each write is a full-document `update` without a field mask or
/// precondition, which Firestore treats as an upsert.
///
/// # Example
///
/// ```ignore
/// use review_indexer_repository::{FirestoreConfig, FirestoreProvider, ResolvedCredential, ServiceAccountSecret};
///
/// let secret = ServiceAccountSecret::from_env()?;
/// let credential = ResolvedCredential::resolve(&secret, None)?;
/// let config = FirestoreConfig::new(credential.project_id.clone(), "reviews");
/// let provider = FirestoreProvider::new(config, &credential)?;
///
/// provider.commit_batch(&documents).await?;
/// ```
pub struct FirestoreProvider {
    client: Client,
    config: FirestoreConfig,
    auth: FirestoreAuth,
}

impl FirestoreProvider {
    /// Create a new Firestore provider.
    ///
    /// Against the production endpoint the credential must carry a key. The
    /// key is parsed here, so a malformed private key fails construction
    /// rather than the first request. Against the emulator the key is ignored.
    ///
    /// # Returns
    ///
    /// * `Ok(FirestoreProvider)` - A new provider instance
    /// * `Err(CredentialError::ClientInit)` - If the key or HTTP client cannot be built
    pub fn new(
        config: FirestoreConfig,
        credential: &ResolvedCredential,
    ) -> Result<Self, CredentialError> {
        let auth = if config.endpoint.is_emulator() {
            FirestoreAuth::Emulator
        } else {
            let key = credential.key.as_ref().ok_or_else(|| {
                CredentialError::client_init("no service account credential for production endpoint")
            })?;
            let account = CustomServiceAccount::from_json(&key.to_json())
                .map_err(|e| CredentialError::client_init(error_chain(&e)))?;
            FirestoreAuth::ServiceAccount(Arc::new(account))
        };

        let client = Client::builder()
            .build()
            .map_err(|e| CredentialError::client_init(error_chain(&e)))?;

        info!(
            project_id = %config.project_id,
            database_id = %config.database_id,
            collection = %config.collection,
            emulator = config.endpoint.is_emulator(),
            "Created Firestore provider"
        );

        Ok(Self {
            client,
            config,
            auth,
        })
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    /// Fetch a bearer token for the datastore scope.
    ///
    /// The service account caches tokens and refreshes them before expiry.
    async fn bearer_token(&self) -> Result<String, ReviewStoreError> {
        match &self.auth {
            FirestoreAuth::Emulator => Ok(EMULATOR_TOKEN.to_string()),
            FirestoreAuth::ServiceAccount(account) => account
                .token(&[DATASTORE_SCOPE])
                .await
                .map(|token| token.as_str().to_string())
                .map_err(|e| ReviewStoreError::auth(error_chain(&e))),
        }
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, ReviewStoreError> {
        let token = self.bearer_token().await?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// Build the `documents:commit` body for a batch.
    fn commit_body(&self, documents: &[ReviewDocument]) -> Result<Value, ReviewStoreError> {
        let writes = documents
            .iter()
            .map(|doc| {
                Ok(json!({
                    "update": {
                        "name": self.config.document_name(doc.document_id()),
                        "fields": codec::encode_document(doc)?,
                    }
                }))
            })
            .collect::<Result<Vec<_>, ReviewStoreError>>()?;

        Ok(json!({ "writes": writes }))
    }

    /// Build the `documents:runQuery` body for a review query.
    fn run_query_body(&self, query: &ReviewQuery) -> Value {
        let mut filters = Vec::new();
        if let Some(ref product_id) = query.product_id {
            filters.push(field_filter("product_id", "EQUAL", json!({ "stringValue": product_id })));
        }
        if let Some(min_rating) = query.min_rating {
            filters.push(field_filter(
                "rating",
                "GREATER_THAN_OR_EQUAL",
                json!({ "doubleValue": min_rating }),
            ));
        }

        let mut structured_query = json!({
            "from": [{ "collectionId": self.config.collection }],
            "limit": query.limit.min(i32::MAX as usize),
        });

        let filter = match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(json!({ "compositeFilter": { "op": "AND", "filters": filters } })),
        };
        if let Some(filter) = filter {
            structured_query["where"] = filter;
        }

        // An inequality on rating makes Firestore page in rating order; pin
        // the tie-break to the document name so the page is deterministic
        if query.min_rating.is_some() {
            structured_query["orderBy"] = json!([
                { "field": { "fieldPath": "rating" }, "direction": "ASCENDING" },
                { "field": { "fieldPath": "__name__" }, "direction": "ASCENDING" },
            ]);
        }

        json!({ "structuredQuery": structured_query })
    }

    /// Decode a Firestore `Document` resource into a stored review.
    fn decode_document(document: &Value) -> Result<StoredReview, ReviewStoreError> {
        let key = document
            .get("name")
            .and_then(Value::as_str)
            .and_then(|name| name.rsplit('/').next())
            .unwrap_or_default();

        let plain = match document.get("fields").and_then(Value::as_object) {
            Some(fields) => codec::decode_fields(fields)?,
            None => json!({}),
        };

        let review: StoredReview = serde_json::from_value(plain)?;
        Ok(review.with_document_key(key))
    }

    async fn error_body(response: Response) -> (StatusCode, String) {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        (status, body)
    }
}

#[async_trait]
impl ReviewStoreProvider for FirestoreProvider {
    /// Verify the credentials by obtaining an access token.
    async fn check_ready(&self) -> Result<(), ReviewStoreError> {
        self.bearer_token().await?;
        debug!(project_id = %self.config.project_id, "Firestore credentials accepted");
        Ok(())
    }

    /// Commit a batch of review documents atomically.
    ///
    /// Document ids are validated before anything is sent, so an unusable id
    /// fails the batch without a network round trip.
    async fn commit_batch(
        &self,
        documents: &[ReviewDocument],
    ) -> Result<BatchCommitSummary, ReviewStoreError> {
        if documents.is_empty() {
            return Ok(BatchCommitSummary::new(0));
        }
        if documents.len() > MAX_WRITES_PER_COMMIT {
            return Err(ReviewStoreError::batch_size_exceeded(
                documents.len(),
                MAX_WRITES_PER_COMMIT,
            ));
        }
        for doc in documents {
            utils::validate_document_id(doc.document_id())?;
        }

        let body = self.commit_body(documents)?;
        let response = self
            .request(Method::POST, self.config.commit_url()?)
            .await?
            .json(&body)
            .send()
            .await
            .map_err(|e| ReviewStoreError::commit(error_chain(&e)))?;

        if !response.status().is_success() {
            let (status, error_body) = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Commit request failed");
            return Err(ReviewStoreError::commit(format!(
                "Commit failed with status {}: {}",
                status, error_body
            )));
        }

        let reply: Value = response
            .json()
            .await
            .map_err(|e| ReviewStoreError::parse(e.to_string()))?;
        let commit_time = reply
            .get("commitTime")
            .and_then(Value::as_str)
            .map(str::to_string);

        debug!(count = documents.len(), commit_time = ?commit_time, "Batch committed");
        Ok(BatchCommitSummary {
            written: documents.len(),
            commit_time,
        })
    }

    async fn get_review(&self, review_id: &str) -> Result<Option<StoredReview>, ReviewStoreError> {
        utils::validate_document_id(review_id)?;

        let response = self
            .request(Method::GET, self.config.document_url(review_id)?)
            .await?
            .send()
            .await
            .map_err(|e| ReviewStoreError::query(error_chain(&e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let (status, error_body) = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Get request failed");
            return Err(ReviewStoreError::query(format!(
                "Get failed with status {}: {}",
                status, error_body
            )));
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| ReviewStoreError::parse(e.to_string()))?;
        Self::decode_document(&document).map(Some)
    }

    /// Run a structured query and return the matching reviews sorted by id.
    ///
    /// With a minimum rating the page is taken in (rating, name) order,
    /// otherwise in name order. Filtering on both `product_id` and `rating`
    /// needs a composite index on the collection.
    async fn query_reviews(
        &self,
        query: &ReviewQuery,
    ) -> Result<Vec<StoredReview>, ReviewStoreError> {
        let body = self.run_query_body(query);
        let response = self
            .request(Method::POST, self.config.run_query_url()?)
            .await?
            .json(&body)
            .send()
            .await
            .map_err(|e| ReviewStoreError::query(error_chain(&e)))?;

        if !response.status().is_success() {
            let (status, error_body) = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Query request failed");
            return Err(ReviewStoreError::query(format!(
                "Query failed with status {}: {}",
                status, error_body
            )));
        }

        // runQuery answers with a JSON array of partial results; entries
        // without a "document" only carry progress metadata
        let entries: Vec<Value> = response
            .json()
            .await
            .map_err(|e| ReviewStoreError::parse(e.to_string()))?;

        let mut reviews = entries
            .iter()
            .filter_map(|entry| entry.get("document"))
            .map(Self::decode_document)
            .collect::<Result<Vec<_>, _>>()?;
        reviews.sort_by(|a, b| a.review_id.cmp(&b.review_id));

        debug!(count = reviews.len(), "Query returned reviews");
        Ok(reviews)
    }
}

fn field_filter(field_path: &str, op: &str, value: Value) -> Value {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": field_path },
            "op": op,
            "value": value,
        }
    })
}

/// Render an error together with all of its sources.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
