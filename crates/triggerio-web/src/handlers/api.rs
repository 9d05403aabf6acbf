//! JSON and export endpoints

use super::{ApiError, ApiSession};
use crate::{
    controller::{DashboardController, FetchOutcome},
    export::{ExportSection, export_csv},
    filters::{DateRange, FilterState},
    state::AppState,
    view::{DashboardView, ViewInsights},
};
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Merged dashboard as served to API clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// A fetch is in flight for this session
    pub loading: bool,
    /// Reporting window of the cached data
    pub date_range: DateRange,
    /// Result of the fetch this request triggered, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<FetchOutcome>,
    /// Section data with live/fallback markers
    pub view: DashboardView,
    /// Figures derived from the view
    pub insights: ViewInsights,
}

impl DashboardResponse {
    fn from_controller(controller: &DashboardController, outcome: Option<FetchOutcome>) -> Self {
        let view = controller.view();
        Self {
            loading: controller.is_loading(),
            date_range: controller.filters().date_range,
            outcome,
            insights: view.insights(),
            view,
        }
    }
}

/// Controller for the caller, fetching on first use
async fn mounted(state: &AppState, token: &str) -> (Arc<DashboardController>, Option<FetchOutcome>) {
    let (controller, created) = state.session(token, &FilterState::default());
    let outcome = if created {
        Some(controller.fetch_dashboard_data().await)
    } else {
        None
    };
    (controller, outcome)
}

/// Current dashboard view
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    ApiSession(token): ApiSession,
) -> Json<DashboardResponse> {
    let (controller, outcome) = mounted(&state, &token).await;
    Json(DashboardResponse::from_controller(&controller, outcome))
}

/// Re-fetch and return the updated view
///
/// A failed fetch still answers 200 with the previous (or fallback) data;
/// `outcome` tells what happened.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    ApiSession(token): ApiSession,
) -> Json<DashboardResponse> {
    let (controller, outcome) = mounted(&state, &token).await;
    let outcome = match outcome {
        Some(outcome) => outcome,
        None => controller.fetch_dashboard_data().await,
    };
    info!(?outcome, "Dashboard refreshed via API");
    Json(DashboardResponse::from_controller(&controller, Some(outcome)))
}

/// Query of the export endpoint
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Section to export
    pub section: String,
}

/// Download one tabular section as CSV
///
/// # Errors
///
/// 400 for an unknown section, 401 without a session.
pub async fn export(
    State(state): State<Arc<AppState>>,
    ApiSession(token): ApiSession,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let section = ExportSection::parse(&query.section)?;
    let (controller, _) = mounted(&state, &token).await;

    let body = export_csv(&controller.view(), section)?;
    debug!(section = section.as_query(), bytes = body.len(), "Exporting section");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", section.file_name()),
            ),
        ],
        body,
    )
        .into_response())
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
