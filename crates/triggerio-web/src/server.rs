//! Web server setup and configuration

use crate::{api_client::DashboardSource, routes::build_routes, state::AppState};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use triggerio_core::{Config, Result};

/// Build the complete web application backed by the configured analytics API
///
/// # Errors
///
/// Returns an error if the analytics API client cannot be created.
pub fn build_app(config: Config) -> Result<Router> {
    let state = Arc::new(AppState::new(config)?);
    Ok(router(state))
}

/// Build the application around a custom payload source
#[must_use]
pub fn build_app_with_source(config: Config, source: Arc<dyn DashboardSource>) -> Router {
    router(Arc::new(AppState::with_source(config, source)))
}

fn router(state: Arc<AppState>) -> Router {
    build_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
