//! Firestore REST adapter for the `DocumentStore` port.
//!
//! Writes go straight to the `documents` endpoints. Live subscriptions are
//! poll-based: a background task re-fetches the document/collection on an
//! interval and emits an event only when the decoded body actually changed.
//! The gRPC listen channel is not available over plain REST, and the mirror's
//! freshness needs are modest, so polling keeps the adapter dependency-light.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::modules::remote::application::ports::outgoing::document_store::{
    CollectionSubscription, DocumentStore, DocumentSubscription, ListenerRegistration,
    RawDocument, RemoteWriteError,
};
use crate::shared::credentials::IdTokenStore;

use super::value_codec;

/// Page size for collection list requests. The portfolio collections are
/// small; one page always suffices.
const LIST_PAGE_SIZE: u32 = 300;

pub struct FirestoreRestStore {
    http: reqwest::Client,
    project_id: String,
    api_key: String,
    tokens: Arc<IdTokenStore>,
    poll_interval: Duration,
}

impl FirestoreRestStore {
    pub fn new(
        project_id: String,
        api_key: String,
        tokens: Arc<IdTokenStore>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            project_id,
            api_key,
            tokens,
            poll_interval,
        }
    }

    fn base_url(&self) -> String {
        format!(
            "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents",
            self.project_id
        )
    }

    fn document_url(&self, collection: &str, doc_id: &str) -> String {
        format!("{}/{}/{}", self.base_url(), collection, doc_id)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .query(&[("key", self.api_key.as_str())]);
        if let Some(token) = self.tokens.get() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn fetch_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> Result<Option<Value>, RemoteWriteError> {
        let url = self.document_url(collection, doc_id);
        let response = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = check_status(response).await?;
        Ok(Some(value_codec::decode_fields(
            body.get("fields").unwrap_or(&Value::Null),
        )))
    }

    async fn fetch_collection(
        &self,
        collection: &str,
    ) -> Result<Vec<RawDocument>, RemoteWriteError> {
        let url = format!("{}/{}", self.base_url(), collection);
        let response = self
            .request(reqwest::Method::GET, &url)
            .query(&[("pageSize", LIST_PAGE_SIZE)])
            .send()
            .await
            .map_err(transport_error)?;

        let body = check_status(response).await?;
        let documents = body
            .get("documents")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut rows = Vec::with_capacity(documents.len());
        for doc in &documents {
            let Some(name) = doc.get("name").and_then(Value::as_str) else {
                continue;
            };
            rows.push(RawDocument {
                id: document_id_from_name(name),
                data: value_codec::decode_fields(doc.get("fields").unwrap_or(&Value::Null)),
            });
        }
        Ok(rows)
    }
}

#[async_trait]
impl DocumentStore for FirestoreRestStore {
    async fn subscribe_document(&self, collection: &str, doc_id: &str) -> DocumentSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let poller = self.clone_for_task();
        let collection = collection.to_string();
        let doc_id = doc_id.to_string();

        let handle = tokio::spawn(async move {
            let mut last: Option<Option<Value>> = None;
            loop {
                match poller.fetch_document(&collection, &doc_id).await {
                    Ok(snapshot) => {
                        if last.as_ref() != Some(&snapshot) {
                            if tx.send(snapshot.clone()).is_err() {
                                break;
                            }
                            last = Some(snapshot);
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%collection, %doc_id, error = %err, "document poll failed");
                    }
                }
                tokio::time::sleep(poller.poll_interval).await;
            }
        });

        DocumentSubscription {
            events: rx,
            registration: ListenerRegistration::new(move || handle.abort()),
        }
    }

    async fn subscribe_collection(&self, collection: &str) -> CollectionSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let poller = self.clone_for_task();
        let collection = collection.to_string();

        let handle = tokio::spawn(async move {
            let mut last: Option<Vec<RawDocument>> = None;
            loop {
                match poller.fetch_collection(&collection).await {
                    Ok(rows) => {
                        if last.as_ref() != Some(&rows) {
                            if tx.send(rows.clone()).is_err() {
                                break;
                            }
                            last = Some(rows);
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%collection, error = %err, "collection poll failed");
                    }
                }
                tokio::time::sleep(poller.poll_interval).await;
            }
        });

        CollectionSubscription {
            events: rx,
            registration: ListenerRegistration::new(move || handle.abort()),
        }
    }

    async fn create_document(
        &self,
        collection: &str,
        data: Value,
    ) -> Result<String, RemoteWriteError> {
        let url = format!("{}/{}", self.base_url(), collection);
        let body = serde_json::json!({ "fields": value_codec::encode_fields(&data) });

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let created = check_status(response).await?;
        let name = created
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RemoteWriteError::Backend("create response missing name".to_string()))?;
        Ok(document_id_from_name(name))
    }

    async fn merge_update(
        &self,
        collection: &str,
        doc_id: &str,
        data: Value,
    ) -> Result<(), RemoteWriteError> {
        let url = self.document_url(collection, doc_id);
        let body = serde_json::json!({ "fields": value_codec::encode_fields(&data) });

        // Listing each present top-level field in the update mask is what
        // turns PATCH into a merge: unnamed fields stay untouched remotely.
        let mask: Vec<(&str, String)> = data
            .as_object()
            .map(|map| {
                map.keys()
                    .map(|key| ("updateMask.fieldPaths", key.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let response = self
            .request(reqwest::Method::PATCH, &url)
            .query(&mask)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response).await.map(|_| ())
    }

    async fn delete_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> Result<(), RemoteWriteError> {
        let url = self.document_url(collection, doc_id);
        let response = self
            .request(reqwest::Method::DELETE, &url)
            .send()
            .await
            .map_err(transport_error)?;

        // Deleting an absent document is a success: the end state is the same.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status(response).await.map(|_| ())
    }
}

impl FirestoreRestStore {
    fn clone_for_task(&self) -> Self {
        Self {
            http: self.http.clone(),
            project_id: self.project_id.clone(),
            api_key: self.api_key.clone(),
            tokens: self.tokens.clone(),
            poll_interval: self.poll_interval,
        }
    }
}

/// Last path segment of a full Firestore resource name
/// (`projects/p/databases/(default)/documents/projects/abc123` -> `abc123`).
fn document_id_from_name(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

fn transport_error(err: reqwest::Error) -> RemoteWriteError {
    RemoteWriteError::Network(err.to_string())
}

async fn check_status(response: reqwest::Response) -> Result<Value, RemoteWriteError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<Value>()
            .await
            .map_err(|e| RemoteWriteError::Backend(e.to_string()));
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| {
            body.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| status.to_string());

    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            Err(RemoteWriteError::PermissionDenied(message))
        }
        _ => Err(RemoteWriteError::Backend(message)),
    }
}
