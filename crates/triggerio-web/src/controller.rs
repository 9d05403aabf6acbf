//! Per-session dashboard state: cached payload, loading flag and filters

use crate::{api_client::DashboardSource, filters::FilterState, view::DashboardView};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::{
    Arc,
    atomic::{AtomicU64, AtomicUsize, Ordering},
};
use tracing::{debug, error, info};
use triggerio_core::DashboardPayload;

/// What a fetch did to the cached payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchOutcome {
    /// The response replaced the cached payload
    Updated,
    /// The backend answered with nothing to store
    Empty,
    /// A newer request had already stored its response; this one was dropped
    Superseded,
    /// The request failed; the cached payload is unchanged
    Failed,
}

#[derive(Debug, Default)]
struct CachedPayload {
    generation: u64,
    payload: Option<Arc<DashboardPayload>>,
}

/// Holds the in-flight count for the duration of one fetch
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// State of one dashboard session
///
/// Requests are numbered as they are issued. A response is stored only if
/// no later-issued request has stored one already, so a slow stale response
/// can never overwrite fresher data. Requests are never cancelled.
pub struct DashboardController {
    source: Arc<dyn DashboardSource>,
    token: String,
    filters: RwLock<FilterState>,
    cache: RwLock<CachedPayload>,
    issued: AtomicU64,
    in_flight: AtomicUsize,
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("filters", &*self.filters.read())
            .field("cache", &*self.cache.read())
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl DashboardController {
    /// Create a controller for a session token
    pub fn new(
        source: Arc<dyn DashboardSource>,
        token: impl Into<String>,
        filters: FilterState,
    ) -> Self {
        Self {
            source,
            token: token.into(),
            filters: RwLock::new(filters),
            cache: RwLock::new(CachedPayload::default()),
            issued: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Fetch the dashboard for the currently selected date range
    ///
    /// Never fails: errors are logged and the previous payload is kept.
    pub async fn fetch_dashboard_data(&self) -> FetchOutcome {
        let _loading = LoadingGuard::enter(&self.in_flight);
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let date_range = self.filters.read().date_range;

        match self.source.fetch_dashboard(date_range, &self.token).await {
            Ok(Some(payload)) => {
                let mut cache = self.cache.write();
                if generation > cache.generation {
                    cache.generation = generation;
                    cache.payload = Some(Arc::new(payload));
                    info!(generation, "Dashboard data updated");
                    FetchOutcome::Updated
                } else {
                    debug!(
                        generation,
                        stored = cache.generation,
                        "Dropping response superseded by a newer request"
                    );
                    FetchOutcome::Superseded
                }
            }
            Ok(None) => {
                debug!(generation, "Dashboard response was empty");
                FetchOutcome::Empty
            }
            Err(e) => {
                error!("Failed to fetch analytics: {}", e);
                FetchOutcome::Failed
            }
        }
    }

    /// Whether any fetch is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Last stored payload, if any
    #[must_use]
    pub fn payload(&self) -> Option<Arc<DashboardPayload>> {
        self.cache.read().payload.clone()
    }

    /// Current filter state
    #[must_use]
    pub fn filters(&self) -> FilterState {
        self.filters.read().clone()
    }

    /// Replace the filter state; returns true when the date range changed
    #[must_use]
    pub fn apply_filters(&self, filters: FilterState) -> bool {
        let mut current = self.filters.write();
        let changed = current.date_range != filters.date_range;
        *current = filters;
        changed
    }

    /// Derive the view for the current state; recomputed on every call
    #[must_use]
    pub fn view(&self) -> DashboardView {
        let payload = self.payload();
        DashboardView::merge(payload.as_deref())
    }
}
