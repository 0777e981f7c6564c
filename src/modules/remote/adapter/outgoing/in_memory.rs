//! In-memory adapter for the `DocumentStore` port.
//!
//! Used for tests and offline local runs. Behaves like the hosted backend at
//! the contract level: merge-writes upsert, deletes are idempotent, and every
//! subscriber receives a fresh snapshot after each mutation (so this client's
//! own writes come back through the live channel, exactly as upstream does).

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::modules::remote::application::ports::outgoing::document_store::{
    CollectionSubscription, DocumentStore, DocumentSubscription, ListenerRegistration,
    RawDocument, RemoteWriteError,
};

struct DocWatcher {
    id: u64,
    collection: String,
    doc_id: String,
    tx: mpsc::UnboundedSender<Option<Value>>,
}

struct CollWatcher {
    id: u64,
    collection: String,
    tx: mpsc::UnboundedSender<Vec<RawDocument>>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, BTreeMap<String, Value>>,
    doc_watchers: Vec<DocWatcher>,
    coll_watchers: Vec<CollWatcher>,
    next_watcher_id: u64,
    fail_writes: bool,
}

#[derive(Default, Clone)]
pub struct InMemoryDocumentStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail, for exercising failure paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Direct read of a document body, bypassing subscriptions.
    pub fn document(&self, collection: &str, doc_id: &str) -> Option<Value> {
        self.lock()
            .collections
            .get(collection)
            .and_then(|docs| docs.get(doc_id))
            .cloned()
    }

    /// Direct snapshot of a collection, bypassing subscriptions.
    pub fn collection(&self, collection: &str) -> Vec<RawDocument> {
        Self::collection_snapshot(&self.lock(), collection)
    }

    /// Seeds a document without going through `create_document`, so tests can
    /// arrange remote state that predates the store's subscriptions.
    pub fn seed_document(&self, collection: &str, doc_id: &str, data: Value) {
        let mut inner = self.lock();
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(doc_id.to_string(), data);
        Self::notify(&mut inner, collection, doc_id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn collection_snapshot(inner: &Inner, collection: &str) -> Vec<RawDocument> {
        inner
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| RawDocument {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn notify(inner: &mut Inner, collection: &str, doc_id: &str) {
        let body = inner
            .collections
            .get(collection)
            .and_then(|docs| docs.get(doc_id))
            .cloned();
        inner.doc_watchers.retain(|watcher| {
            if watcher.collection != collection || watcher.doc_id != doc_id {
                return true;
            }
            watcher.tx.send(body.clone()).is_ok()
        });

        let snapshot = Self::collection_snapshot(inner, collection);
        inner.coll_watchers.retain(|watcher| {
            if watcher.collection != collection {
                return true;
            }
            watcher.tx.send(snapshot.clone()).is_ok()
        });
    }

    fn check_writable(inner: &Inner) -> Result<(), RemoteWriteError> {
        if inner.fail_writes {
            Err(RemoteWriteError::Backend("injected write failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn registration(&self, watcher_id: u64, document: bool) -> ListenerRegistration {
        let inner = self.inner.clone();
        ListenerRegistration::new(move || {
            if let Ok(mut guard) = inner.lock() {
                if document {
                    guard.doc_watchers.retain(|w| w.id != watcher_id);
                } else {
                    guard.coll_watchers.retain(|w| w.id != watcher_id);
                }
            }
        })
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn subscribe_document(&self, collection: &str, doc_id: &str) -> DocumentSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let watcher_id;
        {
            let mut inner = self.lock();
            watcher_id = inner.next_watcher_id;
            inner.next_watcher_id += 1;

            let current = inner
                .collections
                .get(collection)
                .and_then(|docs| docs.get(doc_id))
                .cloned();
            let _ = tx.send(current);

            inner.doc_watchers.push(DocWatcher {
                id: watcher_id,
                collection: collection.to_string(),
                doc_id: doc_id.to_string(),
                tx,
            });
        }

        DocumentSubscription {
            events: rx,
            registration: self.registration(watcher_id, true),
        }
    }

    async fn subscribe_collection(&self, collection: &str) -> CollectionSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let watcher_id;
        {
            let mut inner = self.lock();
            watcher_id = inner.next_watcher_id;
            inner.next_watcher_id += 1;

            let _ = tx.send(Self::collection_snapshot(&inner, collection));
            inner.coll_watchers.push(CollWatcher {
                id: watcher_id,
                collection: collection.to_string(),
                tx,
            });
        }

        CollectionSubscription {
            events: rx,
            registration: self.registration(watcher_id, false),
        }
    }

    async fn create_document(
        &self,
        collection: &str,
        data: Value,
    ) -> Result<String, RemoteWriteError> {
        let mut inner = self.lock();
        Self::check_writable(&inner)?;

        let id = Uuid::new_v4().simple().to_string();
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        Self::notify(&mut inner, collection, &id);
        Ok(id)
    }

    async fn merge_update(
        &self,
        collection: &str,
        doc_id: &str,
        data: Value,
    ) -> Result<(), RemoteWriteError> {
        let mut inner = self.lock();
        Self::check_writable(&inner)?;

        let entry = inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .entry(doc_id.to_string())
            .or_insert_with(|| Value::Object(Default::default()));

        // Merge at the top level only: present fields overwrite whole.
        if let (Value::Object(existing), Value::Object(updates)) = (entry, data) {
            for (key, value) in updates {
                existing.insert(key, value);
            }
        }
        Self::notify(&mut inner, collection, doc_id);
        Ok(())
    }

    async fn delete_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> Result<(), RemoteWriteError> {
        let mut inner = self.lock();
        Self::check_writable(&inner)?;

        let removed = inner
            .collections
            .get_mut(collection)
            .map(|docs| docs.remove(doc_id).is_some())
            .unwrap_or(false);
        if removed {
            Self::notify(&mut inner, collection, doc_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_subscribe_document_gets_initial_and_updates() {
        let store = InMemoryDocumentStore::new();
        store.seed_document("content", "theme", json!({ "primary": "#00FFFF" }));

        let mut sub = store.subscribe_document("content", "theme").await;
        assert_eq!(
            sub.events.recv().await.unwrap(),
            Some(json!({ "primary": "#00FFFF" }))
        );

        store
            .merge_update("content", "theme", json!({ "primary": "#FF0000" }))
            .await
            .unwrap();
        assert_eq!(
            sub.events.recv().await.unwrap(),
            Some(json!({ "primary": "#FF0000" }))
        );
    }

    #[tokio::test]
    async fn test_subscribe_missing_document_yields_none() {
        let store = InMemoryDocumentStore::new();
        let mut sub = store.subscribe_document("content", "about").await;
        assert_eq!(sub.events.recv().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_collection_snapshot_after_create_and_delete() {
        let store = InMemoryDocumentStore::new();
        let mut sub = store.subscribe_collection("projects").await;
        assert!(sub.events.recv().await.unwrap().is_empty());

        let id = store
            .create_document("projects", json!({ "title": "One" }))
            .await
            .unwrap();
        let snapshot = sub.events.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);

        store.delete_document("projects", &id).await.unwrap();
        assert!(sub.events.recv().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_merge_update_preserves_absent_fields() {
        let store = InMemoryDocumentStore::new();
        store.seed_document(
            "content",
            "hero",
            json!({ "title": "Dev", "subtitle": "Sub" }),
        );

        store
            .merge_update("content", "hero", json!({ "title": "New" }))
            .await
            .unwrap();

        assert_eq!(
            store.document("content", "hero").unwrap(),
            json!({ "title": "New", "subtitle": "Sub" })
        );
    }

    #[tokio::test]
    async fn test_delete_missing_document_is_ok() {
        let store = InMemoryDocumentStore::new();
        store.delete_document("projects", "nope").await.unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_registration_stops_events() {
        let store = InMemoryDocumentStore::new();
        let mut sub = store.subscribe_collection("services").await;
        let _ = sub.events.recv().await;

        sub.registration.cancel();
        store
            .create_document("services", json!({ "title": "Audit" }))
            .await
            .unwrap();
        assert!(sub.events.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_injected_write_failure() {
        let store = InMemoryDocumentStore::new();
        store.set_fail_writes(true);
        let err = store
            .create_document("projects", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteWriteError::Backend(_)));
    }
}
