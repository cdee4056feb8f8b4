//! Firestore REST adapter.
//!
//! Documents live under `users/{user_id}` and
//! `users/{user_id}/flashcard_sets/{set_id}`. Owner scoping is structural:
//! set documents are only ever addressed through the owner's subcollection
//! path, so a cross-owner fetch is a plain 404 and surfaces as
//! [`StoreError::NotFoundOrForbidden`] just like a missing document.

pub mod token;
pub mod value;

use async_trait::async_trait;
use cardsmith_core::{sort_summaries, Flashcard, FlashcardSet, FlashcardSetSummary};
use chrono::Utc;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::FirestoreConfig;
use crate::error::StoreError;
use crate::flashcards::FlashcardStore;
use crate::user::{CreateUser, UserRecord, UserStore};

use token::{ServiceAccountKey, TokenError, TokenProvider};

/// Firestore REST API root.
const API_ROOT: &str = "https://firestore.googleapis.com/v1";

/// Bound on any one store round trip, in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Marker used by templated dev key files; treated the same as no key.
const PLACEHOLDER_KEY_MARKER: &str = "DUMMY_PRIVATE_KEY_FOR_TESTING";

/// Store adapter backed by the Firestore REST API.
pub struct FirestoreStore {
    http: reqwest::Client,
    tokens: TokenProvider,
    /// `{API_ROOT}/projects/{project}/databases/(default)/documents`
    documents_url: String,
}

impl FirestoreStore {
    /// Build the adapter from configuration.
    ///
    /// Fails when no project id is configured, when the service-account key
    /// file is missing, unparseable, or a known dev placeholder. Callers
    /// treat any failure here as "run on the in-memory store instead".
    pub fn connect(config: &FirestoreConfig) -> Result<Self, StoreError> {
        let project_id = config
            .project_id
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("no project id configured".to_string()))?;

        let raw_key = std::fs::read_to_string(&config.credentials_path).map_err(|e| {
            StoreError::Unavailable(format!(
                "cannot read credentials file {}: {e}",
                config.credentials_path
            ))
        })?;
        if raw_key.contains(PLACEHOLDER_KEY_MARKER) {
            return Err(StoreError::Unavailable(
                "credentials file contains a placeholder key".to_string(),
            ));
        }

        let key: ServiceAccountKey = serde_json::from_str(&raw_key).map_err(|e| {
            StoreError::Unavailable(format!("invalid service-account key file: {e}"))
        })?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let tokens = TokenProvider::new(key, http.clone())
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self {
            http,
            tokens,
            documents_url: format!(
                "{API_ROOT}/projects/{project_id}/databases/(default)/documents"
            ),
        })
    }

    async fn bearer(&self) -> Result<String, StoreError> {
        self.tokens.access_token().await.map_err(|e| match e {
            TokenError::Api { status, body } => {
                StoreError::Unavailable(format!("token exchange failed ({status}): {body}"))
            }
            other => StoreError::Unavailable(other.to_string()),
        })
    }

    /// Issue a runQuery against `parent_url` and return the matched
    /// documents (Firestore pads the result stream with document-less
    /// entries carrying only a read time).
    async fn run_query(&self, parent_url: &str, query: Value) -> Result<Vec<Value>, StoreError> {
        let token = self.bearer().await?;
        let response = self
            .http
            .post(format!("{parent_url}:runQuery"))
            .bearer_auth(token)
            .json(&json!({ "structuredQuery": query }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "query failed with status {status}"
            )));
        }

        let entries: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(entries
            .into_iter()
            .filter_map(|mut entry| {
                entry
                    .get_mut("document")
                    .map(Value::take)
            })
            .collect())
    }
}

#[async_trait]
impl UserStore for FirestoreStore {
    async fn create(&self, input: CreateUser) -> Result<UserRecord, StoreError> {
        if self.find_by_email(&input.email).await?.is_some() {
            return Err(StoreError::AlreadyExists(input.email));
        }

        let user = UserRecord {
            id: format!("user_{}", Uuid::new_v4().simple()),
            email: input.email,
            display_name: input.display_name,
            password_hash: input.password_hash,
            created_at: Utc::now(),
            last_login: None,
        };

        let token = self.bearer().await?;
        let response = self
            .http
            .post(format!("{}/users", self.documents_url))
            .query(&[("documentId", user.id.as_str())])
            .bearer_auth(token)
            .json(&json!({ "fields": value::encode_user_fields(&user) }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::WriteFailure(format!(
                "user creation failed with status {status}"
            )));
        }

        tracing::info!(user_id = %user.id, "User document created");
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = json!({
            "from": [{ "collectionId": "users" }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "email" },
                    "op": "EQUAL",
                    "value": { "stringValue": email },
                }
            },
            "limit": 1,
        });

        let documents = self.run_query(&self.documents_url, query).await?;
        Ok(documents.first().and_then(value::decode_user))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let token = self.bearer().await?;
        let response = self
            .http
            .get(format!("{}/users/{id}", self.documents_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "user fetch failed with status {status}"
            )));
        }

        let doc: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(value::decode_user(&doc))
    }

    async fn record_login(&self, id: &str) -> Result<(), StoreError> {
        let token = self.bearer().await?;
        let now = Utc::now();
        let response = self
            .http
            .patch(format!("{}/users/{id}", self.documents_url))
            .query(&[
                ("updateMask.fieldPaths", "last_login"),
                ("currentDocument.exists", "true"),
            ])
            .bearer_auth(token)
            .json(&json!({ "fields": { "last_login": value::timestamp_value(&now) } }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::WriteFailure(format!(
                "last_login update failed with status {status}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl FlashcardStore for FirestoreStore {
    async fn save(
        &self,
        owner_id: &str,
        title: &str,
        cards: Vec<Flashcard>,
    ) -> Result<FlashcardSet, StoreError> {
        if cards.is_empty() {
            return Err(StoreError::WriteFailure(
                "refusing to store an empty flashcard set".to_string(),
            ));
        }

        let created_at = Utc::now();
        let token = self.bearer().await?;
        let response = self
            .http
            .post(format!(
                "{}/users/{owner_id}/flashcard_sets",
                self.documents_url
            ))
            .bearer_auth(token)
            .json(&json!({ "fields": value::encode_set_fields(title, &created_at, &cards) }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::WriteFailure(format!(
                "set creation failed with status {status}"
            )));
        }

        let doc: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let set = value::decode_set(&doc, owner_id).ok_or_else(|| {
            StoreError::WriteFailure("store returned an undecodable document".to_string())
        })?;

        tracing::info!(
            owner_id,
            set_id = %set.id,
            cards = set.cards.len(),
            "Flashcard set persisted"
        );
        Ok(set)
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<FlashcardSetSummary>, StoreError> {
        let query = json!({
            "from": [{ "collectionId": "flashcard_sets" }],
            "select": {
                "fields": [
                    { "fieldPath": "title" },
                    { "fieldPath": "created_at" },
                    { "fieldPath": "card_count" },
                ]
            },
            "orderBy": [
                { "field": { "fieldPath": "created_at" }, "direction": "DESCENDING" },
                { "field": { "fieldPath": "__name__" }, "direction": "DESCENDING" },
            ],
        });

        let parent_url = format!("{}/users/{owner_id}", self.documents_url);
        let documents = self.run_query(&parent_url, query).await?;

        let mut summaries: Vec<FlashcardSetSummary> = documents
            .iter()
            .filter_map(value::decode_summary)
            .collect();
        // The query already orders, but the listing guarantee belongs to the
        // adapter, not the backend.
        sort_summaries(&mut summaries);
        Ok(summaries)
    }

    async fn get_by_id(&self, id: &str, owner_id: &str) -> Result<FlashcardSet, StoreError> {
        let token = self.bearer().await?;
        let response = self
            .http
            .get(format!(
                "{}/users/{owner_id}/flashcard_sets/{id}",
                self.documents_url
            ))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFoundOrForbidden);
        }
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "set fetch failed with status {status}"
            )));
        }

        let doc: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        value::decode_set(&doc, owner_id)
            .ok_or_else(|| StoreError::Unavailable("undecodable set document".to_string()))
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<(), StoreError> {
        let token = self.bearer().await?;
        let response = self
            .http
            .delete(format!(
                "{}/users/{owner_id}/flashcard_sets/{id}",
                self.documents_url
            ))
            // Deleting a missing document is a success for Firestore; the
            // precondition turns it into an error we can report.
            .query(&[("currentDocument.exists", "true")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::NOT_FOUND
            || status == StatusCode::CONFLICT
            || status == StatusCode::BAD_REQUEST
        {
            // Firestore reports a failed exists-precondition as 400/409
            // depending on the API revision; all of them mean "not yours".
            Err(StoreError::NotFoundOrForbidden)
        } else {
            Err(StoreError::WriteFailure(format!(
                "set deletion failed with status {status}"
            )))
        }
    }
}
