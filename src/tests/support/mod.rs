//! Shared fixtures for the end-to-end tests.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::content::adapter::outgoing::css_variables::CssVariableSink;
use crate::content::application::store::ContentStore;
use crate::remote::adapter::outgoing::in_memory::InMemoryDocumentStore;
use crate::shared::notify::Notifier;

pub struct TestHarness {
    pub backend: Arc<InMemoryDocumentStore>,
    pub sink: Arc<CssVariableSink>,
    pub store: ContentStore,
}

/// A store wired to an in-memory backend, already listening.
pub async fn started_store() -> TestHarness {
    let backend = Arc::new(InMemoryDocumentStore::new());
    start_with(backend).await
}

pub async fn start_with(backend: Arc<InMemoryDocumentStore>) -> TestHarness {
    let sink = Arc::new(CssVariableSink::new());
    let store = ContentStore::new(backend.clone(), sink.clone(), Notifier::disconnected());
    store.start().await;
    TestHarness {
        backend,
        sink,
        store,
    }
}

/// Waits until the watched value satisfies the predicate, or fails the test
/// after two seconds.
pub async fn wait_until<T, F>(rx: &mut watch::Receiver<T>, pred: F) -> T
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            {
                let value = rx.borrow_and_update();
                if pred(&value) {
                    return value.clone();
                }
            }
            rx.changed().await.expect("watch channel closed");
        }
    })
    .await
    .expect("condition not reached in time")
}
