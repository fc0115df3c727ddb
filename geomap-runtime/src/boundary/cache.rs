use async_lock::Mutex;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use geojson::GeoJson;
use geomap_common::error::{GeoMapError, Result};
use lru::LruCache;
use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::panic::{resume_unwind, AssertUnwindSafe};
use std::sync::Arc;

type Document = Arc<GeoJson>;
type FetchOutcome = std::result::Result<Document, Arc<GeoMapError>>;
type PendingFetch = Shared<BoxFuture<'static, FetchOutcome>>;

/// Boundary documents by URL.
///
/// Each load runs as its own task that records the outcome when it finishes: a
/// document goes into the LRU, an error is handed to the waiters and then forgotten.
/// Callers only wait on that task, so a caller that gives up (a dropped future, an
/// aborted handle, a timeout) never leaves a load half registered.
#[derive(Clone)]
pub struct BoundaryCache {
    documents: Arc<Mutex<LruCache<String, Document>>>,
    pending: Arc<Mutex<HashMap<String, PendingFetch>>>,
}

impl BoundaryCache {
    /// A capacity of zero is treated as one
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            documents: Arc::new(Mutex::new(LruCache::new(capacity))),
            pending: Default::default(),
        }
    }

    /// Forget loaded documents. Loads in flight still store their result.
    pub async fn clear(&self) {
        self.documents.lock().await.clear();
    }

    pub async fn num_documents(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn num_pending(&self) -> usize {
        self.pending.lock().await.len()
    }

    async fn cached(&self, url: &str) -> Option<Document> {
        // `get` bumps the LRU order, so this takes the exclusive lock
        self.documents.lock().await.get(url).cloned()
    }

    /// The cached document for `url`, or the outcome of `load`. A load already in
    /// flight for the same URL is joined instead of starting `load`.
    pub async fn get_or_load<F>(&self, url: &str, load: F) -> Result<Document>
    where
        F: Future<Output = Result<Document>> + Send + 'static,
    {
        if let Some(document) = self.cached(url).await {
            log::debug!("Boundary cache hit for {url}");
            return Ok(document);
        }

        let pending = {
            let mut pending = self.pending.lock().await;
            if let Some(fetch) = pending.get(url) {
                fetch.clone()
            } else if let Some(document) = self.cached(url).await {
                // Finished between the first lookup and taking the lock
                return Ok(document);
            } else {
                let fetch = self.spawn_load(url.to_string(), load);
                pending.insert(url.to_string(), fetch.clone());
                fetch
            }
        };

        pending.await.map_err(|err| err.duplicate())
    }

    fn spawn_load<F>(&self, url: String, load: F) -> PendingFetch
    where
        F: Future<Output = Result<Document>> + Send + 'static,
    {
        let documents = self.documents.clone();
        let pending = self.pending.clone();

        let task = tokio::spawn(async move {
            let outcome = AssertUnwindSafe(load).catch_unwind().await;
            if let Ok(Ok(document)) = &outcome {
                documents.lock().await.put(url.clone(), document.clone());
            }
            // Store before unregistering so a late caller finds one or the other
            pending.lock().await.remove(&url);
            match outcome {
                Ok(result) => result,
                Err(payload) => resume_unwind(payload),
            }
        });

        async move {
            match task.await {
                Ok(result) => result.map_err(Arc::new),
                Err(err) if err.is_panic() => resume_unwind(err.into_panic()),
                Err(err) => Err(Arc::new(GeoMapError::internal(format!(
                    "Boundary load was cancelled: {err}"
                )))),
            }
        }
        .boxed()
        .shared()
    }
}
