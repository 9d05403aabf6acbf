//! Route definitions for the dashboard server

use crate::{
    handlers::{api, pages},
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Build the complete web application router
#[must_use]
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Page routes
        .route("/", get(pages::dashboard))
        .route("/refresh", post(pages::refresh))
        // JSON API
        .route("/api/dashboard", get(api::dashboard))
        .route("/api/dashboard/refresh", post(api::refresh))
        // Export
        .route("/export/csv", get(api::export))
        // Health check
        .route("/health", get(api::health_check))
}
