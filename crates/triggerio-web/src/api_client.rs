//! HTTP client for the analytics backend

use crate::filters::DateRange;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use triggerio_core::{DashboardPayload, Error, Result, config::ApiConfig};

/// Anything that can produce a dashboard payload for a session
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Fetch the pre-aggregated dashboard payload
    ///
    /// `Ok(None)` means the backend answered successfully with nothing to store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FetchFailed`] for network, HTTP status or parse failures.
    async fn fetch_dashboard(
        &self,
        date_range: DateRange,
        token: &str,
    ) -> Result<Option<DashboardPayload>>;
}

/// API client for making HTTP requests to the analytics backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    dashboard_path: String,
}

impl ApiClient {
    /// Create a new API client with default settings
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let defaults = ApiConfig::default();
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            dashboard_path: defaults.dashboard_path,
        }
    }

    /// Create a client from configuration, applying the request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|e| Error::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dashboard_path: config.dashboard_path.clone(),
        })
    }

    /// Override the dashboard endpoint path
    #[must_use]
    pub fn with_dashboard_path(mut self, path: impl Into<String>) -> Self {
        self.dashboard_path = path.into();
        self
    }

    /// Full URL of the dashboard endpoint
    #[must_use]
    pub fn dashboard_url(&self) -> String {
        format!("{}{}", self.base_url, self.dashboard_path)
    }
}

#[async_trait]
impl DashboardSource for ApiClient {
    async fn fetch_dashboard(
        &self,
        date_range: DateRange,
        token: &str,
    ) -> Result<Option<DashboardPayload>> {
        let url = self.dashboard_url();
        debug!("Fetching dashboard from {} for {}", url, date_range.as_query());

        let response = self
            .client
            .get(&url)
            .query(&[("dateRange", date_range.as_query())])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::fetch(format!("Failed to fetch dashboard: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::FetchFailed {
                status: Some(status.as_u16()),
                message: format!("API returned error: {status}"),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::fetch(format!("Failed to read dashboard response: {e}")))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice::<Option<DashboardPayload>>(&body)
            .map_err(|e| Error::fetch(format!("Failed to parse dashboard response: {e}")))
    }
}
