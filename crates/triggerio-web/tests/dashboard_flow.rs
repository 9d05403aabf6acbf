//! End-to-end tests of the dashboard router against a mock analytics backend

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use axum::http::{Method, StatusCode, header};
use common::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header as header_is, method, path, query_param},
};

const DASHBOARD_PATH: &str = "/api/analytics/dashboard";

async fn backend_answering(status: u16, body: Value, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DASHBOARD_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_url_token_is_stored_and_stripped() {
    let backend = backend_answering(200, json!({}), 0).await;
    let app = app_for(&backend);

    let response = get(&app, "/?dateRange=last_7_days&token=abc123", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        header_str(&response, header::LOCATION),
        Some("/?dateRange=last_7_days")
    );
    let cookie = header_str(&response, header::SET_COOKIE).unwrap();
    assert!(cookie.starts_with("triggerio_token=abc123;"));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_missing_session_redirects_to_auth() {
    let backend = backend_answering(200, json!({}), 0).await;
    let app = app_for(&backend);

    let response = get(&app, "/", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_str(&response, header::LOCATION), Some(AUTH_URL));
}

#[tokio::test]
async fn test_backend_failure_renders_fallback() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DASHBOARD_PATH))
        .and(query_param("dateRange", "last_30_days"))
        .and(header_is("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let response = get(&app, "/", Some(SESSION_COOKIE)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(r#"<div class="card-value">94%</div>"#));
    assert!(html.contains("Overall Conversion Rate: 7.1%"));
    assert!(!html.contains("جاري التحميل"));
}

#[tokio::test]
async fn test_partial_overview_renders_blanks() {
    let backend = backend_answering(200, json!({ "overview": { "successRate": 88 } }), 1).await;
    let app = app_for(&backend);

    let html = body_string(get(&app, "/", Some(SESSION_COOKIE)).await).await;

    assert!(html.contains(r#"<div class="card-value">88%</div>"#));
    assert!(!html.contains(r#"<div class="card-value">142</div>"#));
    assert!(html.contains(r#"id="overview" data-source="live""#));
    assert!(html.contains(r#"id="funnel" data-source="fallback""#));
}

#[tokio::test]
async fn test_incomplete_rows_keep_live_section() {
    let backend = backend_answering(
        200,
        json!({
            "funnelData": [
                { "stage": "Contact", "count": 40, "percentage": 100, "color": "#7C3AED" },
                { "stage": "Customer", "count": 4 },
            ],
        }),
        1,
    )
    .await;
    let app = app_for(&backend);

    let html = body_string(get(&app, "/", Some(SESSION_COOKIE)).await).await;

    assert!(html.contains(r#"id="funnel" data-source="live""#));
    assert!(html.contains(r#"<div class="funnel-count">4</div>"#));
    assert!(html.contains("Overall Conversion Rate: 10.0% (Contact → Customer)"));
    assert!(!html.contains("Subscriber"));
}

#[tokio::test]
async fn test_reload_reuses_session_and_date_change_refetches() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("dateRange", "last_30_days"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(query_param("dateRange", "last_7_days"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    get(&app, "/", Some(SESSION_COOKIE)).await;
    get(&app, "/?dateMenu=open", Some(SESSION_COOKIE)).await;
    let html = body_string(get(&app, "/?dateRange=last_7_days", Some(SESSION_COOKIE)).await).await;

    assert!(html.contains("آخر 7 أيام ▾"));
}

#[tokio::test]
async fn test_refresh_refetches_and_returns_to_page() {
    let backend = backend_answering(200, json!({}), 2).await;
    let app = app_for(&backend);

    get(&app, "/", Some(SESSION_COOKIE)).await;
    let response = send(&app, Method::POST, "/refresh", Some(SESSION_COOKIE)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_str(&response, header::LOCATION), Some("/"));
}

#[tokio::test]
async fn test_api_without_session_is_unauthorized() {
    let backend = backend_answering(200, json!({}), 0).await;
    let app = app_for(&backend);

    let response = get(&app, "/api/dashboard", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["redirectTo"], AUTH_URL);
}

#[tokio::test]
async fn test_api_dashboard_marks_sources() {
    let backend = backend_answering(
        200,
        json!({ "emailCampaigns": [], "overview": { "successRate": 88 } }),
        2,
    )
    .await;
    let app = app_for(&backend);

    let response = get(&app, "/api/dashboard", Some(SESSION_COOKIE)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();

    assert_eq!(body["loading"], false);
    assert_eq!(body["dateRange"], "last_30_days");
    assert_eq!(body["outcome"], "updated");
    assert_eq!(body["view"]["overview"]["source"], "live");
    assert_eq!(body["view"]["emailCampaigns"]["data"], json!([]));
    assert_eq!(body["view"]["funnel"]["source"], "fallback");
    assert_eq!(body["insights"]["socialTotal"], 2743);

    let refreshed = send(&app, Method::POST, "/api/dashboard/refresh", Some(SESSION_COOKIE)).await;
    let body: Value = serde_json::from_str(&body_string(refreshed).await).unwrap();
    assert_eq!(body["outcome"], "updated");
}

#[tokio::test]
async fn test_csv_export() {
    let backend = backend_answering(500, json!(null), 1).await;
    let app = app_for(&backend);

    let response = get(&app, "/export/csv?section=funnel", Some(SESSION_COOKIE)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_str(&response, header::CONTENT_TYPE),
        Some("text/csv; charset=utf-8")
    );
    let csv = body_string(response).await;
    assert!(csv.starts_with("stage,count,percentage,color\nContact,1247,100.0,#7C3AED\n"));

    let unknown = get(&app, "/export/csv?section=pdf", Some(SESSION_COOKIE)).await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let backend = backend_answering(200, json!({}), 0).await;
    let app = app_for(&backend);

    let response = get(&app, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}
