//! Browser-facing handlers: the gated dashboard page and the refresh action

use crate::{
    filters::FilterState,
    pages::render_dashboard,
    session::{CookieTokenStore, GateDecision, path_and_query},
    state::AppState,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, error, warn};

fn page_url(uri: &Uri) -> Option<Url> {
    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());
    Url::parse("http://localhost/").ok()?.join(path).ok()
}

fn with_cookies(store: &CookieTokenStore, response: impl IntoResponse) -> Response {
    let cookies: Vec<_> = store
        .set_cookie_headers()
        .iter()
        .map(|value| (header::SET_COOKIE, value.clone()))
        .collect();
    (AppendHeaders(cookies), response).into_response()
}

/// Dashboard page
///
/// Runs the session gate first. A token handed over in the URL is stored in
/// the session cookie and the browser is sent to the same page without it.
/// Without a session the browser goes to the auth service. Otherwise the
/// session's dashboard is fetched when it is first opened or when the date
/// range changes, then rendered.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let Some(mut url) = page_url(&uri) else {
        warn!("Rejecting unparsable page URL");
        return StatusCode::BAD_REQUEST.into_response();
    };
    let mut store =
        CookieTokenStore::from_headers(&headers, state.config.auth.session_max_age_secs);

    let token = match state.gate.run(&mut url, &mut store) {
        GateDecision::Redirect { location } => return Redirect::to(&location).into_response(),
        GateDecision::Proceed {
            url_rewritten: true,
            ..
        } => {
            return with_cookies(&store, Redirect::to(&path_and_query(&url)));
        }
        GateDecision::Proceed { token, .. } => token,
    };

    let filters = FilterState::from_query(url.query());
    let (controller, created) = state.session(&token, &filters);
    let date_changed = !created && controller.apply_filters(filters);
    if created || date_changed {
        debug!(created, date_changed, "Fetching dashboard for page load");
        controller.fetch_dashboard_data().await;
    }

    match render_dashboard(&controller.view(), &controller.filters(), controller.is_loading()) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render dashboard page: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Re-fetch the dashboard, then go back to the page with the same filters
pub async fn refresh(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let store = CookieTokenStore::from_headers(&headers, state.config.auth.session_max_age_secs);
    let Some(token) = state.gate.session_token(&store) else {
        return Redirect::to(&state.config.auth.auth_url).into_response();
    };

    let (controller, _) = state.session(&token, &FilterState::default());
    controller.fetch_dashboard_data().await;

    let filters = FilterState {
        show_date_dropdown: false,
        show_export_dropdown: false,
        ..controller.filters()
    };
    Redirect::to(&filters.href()).into_response()
}
