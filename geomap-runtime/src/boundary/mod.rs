//! Loading the boundary (GeoJSON) document of a chart.

mod cache;
mod fetch;

pub use cache::BoundaryCache;
pub use fetch::HttpBoundaryFetcher;

use async_trait::async_trait;
use geojson::GeoJson;
use geomap_common::error::Result;
use std::sync::Arc;

#[async_trait]
pub trait BoundaryFetcher: Send + Sync {
    /// Load and parse the document at `url`. Every failure is a boundary fetch error.
    async fn fetch(&self, url: &str) -> Result<Arc<GeoJson>>;
}

/// Fetcher that serves repeated URLs from an LRU cache and shares in-flight requests
#[derive(Clone)]
pub struct CachedBoundaryFetcher {
    inner: Arc<dyn BoundaryFetcher>,
    cache: BoundaryCache,
}

impl CachedBoundaryFetcher {
    pub fn new(inner: Arc<dyn BoundaryFetcher>, capacity: usize) -> Self {
        Self {
            inner,
            cache: BoundaryCache::new(capacity),
        }
    }

    pub fn cache(&self) -> &BoundaryCache {
        &self.cache
    }
}

#[async_trait]
impl BoundaryFetcher for CachedBoundaryFetcher {
    async fn fetch(&self, url: &str) -> Result<Arc<GeoJson>> {
        let inner = self.inner.clone();
        let owned_url = url.to_string();
        self.cache
            .get_or_load(url, async move { inner.fetch(&owned_url).await })
            .await
    }
}
