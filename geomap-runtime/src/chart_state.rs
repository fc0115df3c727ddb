//! Render state of one map chart.
//!
//! The only asynchronous work is loading the boundary document. Every load is tagged
//! with a generation number and its outcome is kept only if no newer load started in
//! the meantime, so the most recently requested boundary always wins.

use crate::boundary::{BoundaryFetcher, CachedBoundaryFetcher, HttpBoundaryFetcher};
use crate::config::RuntimeConfig;
use geomap_common::data::table::RowTable;
use geomap_common::error::Result;
use geomap_core::map_type::build_query;
use geomap_core::render::{render_chart, BoundaryState, RenderContext, RenderOutcome};
use geomap_core::spec::form_data::ChartFormData;
use geomap_core::spec::query::QuerySpec;
use geomap_core::viewport::Surface;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct BoundarySlot {
    generation: u64,
    state: BoundaryState,
}

pub struct MapChartState {
    config: RuntimeConfig,
    fetcher: Arc<dyn BoundaryFetcher>,
    boundary: Mutex<BoundarySlot>,
}

impl MapChartState {
    /// State that fetches boundaries over HTTP through an LRU cache
    pub fn try_new(config: RuntimeConfig) -> Result<Self> {
        let http = HttpBoundaryFetcher::try_new(config.request_timeout())?;
        let fetcher =
            CachedBoundaryFetcher::new(Arc::new(http), config.boundary_cache_capacity);
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    pub fn with_fetcher(config: RuntimeConfig, fetcher: Arc<dyn BoundaryFetcher>) -> Self {
        Self {
            config,
            fetcher,
            boundary: Default::default(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Query for the chart. Configuration errors are returned before any data is fetched.
    pub fn build_query(&self, form_data: &ChartFormData) -> Result<QuerySpec> {
        build_query(form_data)
    }

    pub fn boundary_state(&self) -> BoundaryState {
        self.lock_slot().state.clone()
    }

    /// Load the boundary document `form_data` asks for and return the state after the
    /// load. If a newer load started while this one was in flight, this one's outcome
    /// is dropped and the returned state is whatever the newer load left.
    ///
    /// Form data that fails query validation never triggers a load.
    pub async fn update_boundary(&self, form_data: &ChartFormData) -> BoundaryState {
        let requested = match build_query(form_data) {
            Ok(_) => form_data.boundary_url().filter(|_| form_data.wants_boundary()),
            Err(err) => {
                log::debug!("Not loading boundary for invalid chart: {}", err.message());
                None
            }
        };
        let url = match requested {
            Some(url) => url.to_string(),
            None => {
                let mut slot = self.lock_slot();
                slot.generation += 1;
                slot.state = BoundaryState::NotRequested;
                return slot.state.clone();
            }
        };

        let generation = {
            let mut slot = self.lock_slot();
            slot.generation += 1;
            slot.state = BoundaryState::Pending { url: url.clone() };
            slot.generation
        };

        let state = match self.fetcher.fetch(&url).await {
            Ok(document) => BoundaryState::Loaded {
                url: url.clone(),
                document,
            },
            Err(err) => {
                log::error!("Error loading GeoJSON data from {url}: {err}");
                BoundaryState::Failed {
                    url: url.clone(),
                    message: err.message(),
                }
            }
        };

        let mut slot = self.lock_slot();
        if slot.generation == generation {
            slot.state = state;
        } else {
            log::warn!(
                "Discarding boundary document for {url}: load {generation} superseded by load {}",
                slot.generation
            );
        }
        slot.state.clone()
    }

    /// Start a boundary load in the background
    pub fn spawn_update_boundary(
        self: &Arc<Self>,
        form_data: ChartFormData,
    ) -> tokio::task::JoinHandle<BoundaryState> {
        let state = self.clone();
        tokio::spawn(async move { state.update_boundary(&form_data).await })
    }

    /// Render with whatever boundary outcome is currently known
    pub fn render(
        &self,
        form_data: &ChartFormData,
        rows: &RowTable,
        surface: Surface,
    ) -> RenderOutcome {
        let boundary = self.boundary_state();
        let ctx = RenderContext {
            form_data,
            rows,
            boundary: &boundary,
            surface,
            options: &self.config.render,
        };
        render_chart(&ctx)
    }

    /// Load the boundary document, then render. Invalid form data renders its
    /// placeholder without loading anything.
    pub async fn load_and_render(
        &self,
        form_data: &ChartFormData,
        rows: &RowTable,
        surface: Surface,
    ) -> RenderOutcome {
        self.update_boundary(form_data).await;
        self.render(form_data, rows, surface)
    }

    /// [`Self::load_and_render`] for hosts without an async runtime
    #[cfg(feature = "multi-thread")]
    pub fn load_and_render_blocking(
        &self,
        form_data: &ChartFormData,
        rows: &RowTable,
        surface: Surface,
    ) -> RenderOutcome {
        crate::tokio_runtime::TOKIO_RUNTIME
            .block_on(self.load_and_render(form_data, rows, surface))
    }

    fn lock_slot(&self) -> MutexGuard<'_, BoundarySlot> {
        // The slot is always left consistent, so a poisoned lock is still usable
        self.boundary.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
