//! Request handlers and the pieces they share

pub mod api;
pub mod pages;

use crate::{session::CookieTokenStore, state::AppState};
use axum::{
    Json, async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::{fmt, sync::Arc};
use triggerio_core::Error;

/// Error returned by the JSON endpoints
#[derive(Debug)]
pub struct ApiError {
    /// Error message
    pub message: String,
    /// HTTP status code
    pub status: StatusCode,
    /// Error code for API responses
    pub code: &'static str,
    /// Where to send the user, for missing sessions
    pub redirect_to: Option<String>,
}

impl ApiError {
    /// Create a new API error
    #[must_use]
    pub fn new(message: impl Into<String>, status: StatusCode, code: &'static str) -> Self {
        Self {
            message: message.into(),
            status,
            code,
            redirect_to: None,
        }
    }

    /// Create a bad request error
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST, "BAD_REQUEST")
    }

    /// Create an internal server error
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        match error {
            Error::AuthMissing { redirect_to } => Self {
                redirect_to: Some(redirect_to),
                ..Self::new("No session", StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
            },
            Error::Validation { .. } => Self::bad_request(error.to_string()),
            other => Self::internal_error(other.to_string()),
        }
    }
}

/// Body of an [`ApiError`] response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: &'static str,
    /// Auth URL for missing sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let response = ApiErrorResponse {
            error: self.message,
            code: self.code,
            redirect_to: self.redirect_to,
        };

        (self.status, Json(response)).into_response()
    }
}

/// Session token of an API caller, read from the session cookie
///
/// API routes answer 401 instead of redirecting; the browser page is the
/// one place that navigates to the auth service.
#[derive(Debug, Clone)]
pub struct ApiSession(pub String);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for ApiSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let store = CookieTokenStore::from_headers(
            &parts.headers,
            state.config.auth.session_max_age_secs,
        );

        state.gate.session_token(&store).map(Self).ok_or_else(|| {
            Error::AuthMissing {
                redirect_to: state.config.auth.auth_url.clone(),
            }
            .into()
        })
    }
}
