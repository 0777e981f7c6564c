use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

//
// ──────────────────────────────────────────────────────────
// Snapshot types
// ──────────────────────────────────────────────────────────
//

/// One document out of a collection snapshot. The id is the document key in
/// the backend; `data` is the decoded JSON body without the id.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: String,
    pub data: Value,
}

/// Live registration handle for a subscription. Cancelling (or dropping) the
/// registration stops the upstream listener; the paired event receiver then
/// closes. Registrations are only ever cancelled at store teardown.
pub struct ListenerRegistration {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerRegistration {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Live subscription to a single document.
///
/// Each event is the best-known body of the document: `Some(value)` when the
/// document exists, `None` when it does not. The first event fires as soon as
/// the initial state is known; later events fire on every upstream change,
/// including this client's own writes.
pub struct DocumentSubscription {
    pub events: mpsc::UnboundedReceiver<Option<Value>>,
    pub registration: ListenerRegistration,
}

/// Live subscription to a whole collection. Every event carries the full
/// current membership; no ordering is guaranteed by the backend.
pub struct CollectionSubscription {
    pub events: mpsc::UnboundedReceiver<Vec<RawDocument>>,
    pub registration: ListenerRegistration,
}

//
// ──────────────────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────────────────
//

/// Write failure surfaced to callers. Carries the provider's own message so
/// call sites can show it verbatim. Writes are never retried automatically.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteWriteError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("backend error: {0}")]
    Backend(String),
}

//
// ──────────────────────────────────────────────────────────
// Port
// ──────────────────────────────────────────────────────────
//

/// Outgoing port for the remote document/collection database.
///
/// Singleton documents are addressed as `(collection, doc_id)` with fixed
/// logical names; collection documents get server-generated ids. Updates are
/// merge-writes: top-level fields present in the payload overwrite, absent
/// fields are preserved. Deletes are idempotent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn subscribe_document(&self, collection: &str, doc_id: &str) -> DocumentSubscription;

    async fn subscribe_collection(&self, collection: &str) -> CollectionSubscription;

    /// Creates a document with a server-generated id and returns that id.
    async fn create_document(
        &self,
        collection: &str,
        data: Value,
    ) -> Result<String, RemoteWriteError>;

    /// Merge-write: `data` must be a JSON object; its top-level fields
    /// overwrite, everything else on the remote document is untouched.
    async fn merge_update(
        &self,
        collection: &str,
        doc_id: &str,
        data: Value,
    ) -> Result<(), RemoteWriteError>;

    async fn delete_document(&self, collection: &str, doc_id: &str)
        -> Result<(), RemoteWriteError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_registration_cancel_runs_once() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let reg = ListenerRegistration::new(move || {
            flag.store(true, Ordering::SeqCst);
        });

        reg.cancel();
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_registration_cancels_on_drop() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        {
            let _reg = ListenerRegistration::new(move || {
                flag.store(true, Ordering::SeqCst);
            });
        }
        assert!(fired.load(Ordering::SeqCst));
    }
}
