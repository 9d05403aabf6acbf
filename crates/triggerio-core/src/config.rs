//! Configuration management for the Triggerio analytics dashboard

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Web server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Analytics backend configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Session and authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds without a request after which a dashboard session is dropped
    #[serde(default = "default_session_idle_timeout")]
    pub session_idle_timeout: u64,

    /// Most dashboard sessions held at once; the least recently used go first
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

/// Analytics backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the analytics backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the dashboard analytics endpoint
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Session and authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// External authentication URL used when no session exists
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Client storage key holding the session token
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Query parameter carrying a freshly issued token
    #[serde(default = "default_token_param")]
    pub token_param: String,

    /// Lifetime of the stored session token in seconds
    #[serde(default = "default_session_max_age")]
    pub session_max_age_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_session_idle_timeout() -> u64 {
    30 * 60
}

const fn default_max_sessions() -> usize {
    10_000
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_dashboard_path() -> String {
    "/api/analytics/dashboard".to_string()
}

const fn default_request_timeout() -> u64 {
    30
}

fn default_auth_url() -> String {
    "http://localhost:3001/login".to_string()
}

fn default_storage_key() -> String {
    "triggerio_token".to_string()
}

fn default_token_param() -> String {
    "token".to_string()
}

const fn default_session_max_age() -> u64 {
    30 * 24 * 60 * 60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_timeout: default_session_idle_timeout(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            dashboard_path: default_dashboard_path(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            storage_key: default_storage_key(),
            token_param: default_token_param(),
            session_max_age_secs: default_session_max_age(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether log lines should be emitted as JSON
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from `config.*` in the working directory and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (or `config.*` when `None`)
    /// and `TRIGGERIO_`-prefixed environment variables, e.g. `TRIGGERIO_API__BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("TRIGGERIO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that serde defaults cannot guard
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] naming the first offending field.
    pub fn validate(&self) -> crate::Result<()> {
        if self.auth.storage_key.trim().is_empty() {
            return Err(invalid("auth.storage_key", "must not be empty"));
        }
        if self.auth.token_param.trim().is_empty() {
            return Err(invalid("auth.token_param", "must not be empty"));
        }
        if !is_http_url(&self.api.base_url) {
            return Err(invalid("api.base_url", "must be an http(s) URL"));
        }
        if !is_http_url(&self.auth.auth_url) {
            return Err(invalid("auth.auth_url", "must be an http(s) URL"));
        }
        if !self.api.dashboard_path.starts_with('/') {
            return Err(invalid("api.dashboard_path", "must start with '/'"));
        }
        if self.api.request_timeout == 0 {
            return Err(invalid("api.request_timeout", "must be greater than zero"));
        }
        if self.server.session_idle_timeout == 0 {
            return Err(invalid("server.session_idle_timeout", "must be greater than zero"));
        }
        if self.server.max_sessions == 0 {
            return Err(invalid("server.max_sessions", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> crate::Error {
    crate::Error::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::field_reassign_with_default)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.session_idle_timeout, 1800);
        assert_eq!(config.server.max_sessions, 10_000);

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.dashboard_path, "/api/analytics/dashboard");
        assert_eq!(config.api.request_timeout, 30);

        assert_eq!(config.auth.storage_key, "triggerio_token");
        assert_eq!(config.auth.token_param, "token");
        assert_eq!(config.auth.session_max_age_secs, 2_592_000);

        assert_eq!(config.logging.level, "info");
        assert!(config.logging.is_json());

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json_str = r#"{
            "server": {"port": 9000},
            "auth": {"auth_url": "https://auth.example.com/login"}
        }"#;

        let config: Config = serde_json::from_str(json_str).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.auth_url, "https://auth.example.com/login");
        assert_eq!(config.auth.storage_key, "triggerio_token");
        assert_eq!(config.api.request_timeout, 30);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_empty_storage_key_rejected() {
        let mut config = Config::default();
        config.auth.storage_key = "  ".to_string();

        match config.validate() {
            Err(crate::Error::Validation { field, .. }) => assert_eq!(field, "auth.storage_key"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_http_urls_rejected() {
        let mut config = Config::default();
        config.api.base_url = "localhost:8080".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.auth_url = "https://".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.base_url = "ftp://files.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparsable_urls_rejected() {
        let mut config = Config::default();
        config.api.base_url = "http://exa mple:99999".to_string();
        match config.validate() {
            Err(crate::Error::Validation { field, .. }) => assert_eq!(field, "api.base_url"),
            other => panic!("expected validation error, got {other:?}"),
        }

        let mut config = Config::default();
        config.auth.auth_url = "http://[::1".to_string();
        match config.validate() {
            Err(crate::Error::Validation { field, .. }) => assert_eq!(field, "auth.auth_url"),
            other => panic!("expected validation error, got {other:?}"),
        }

        let mut config = Config::default();
        config.api.base_url = "http://[::1]:8080".to_string();
        config.auth.auth_url = "https://auth.example.com:8443/login?next=/".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_session_limits_must_be_positive() {
        let mut config = Config::default();
        config.server.max_sessions = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.session_idle_timeout = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dashboard_path_and_timeout_rules() {
        let mut config = Config::default();
        config.api.dashboard_path = "analytics/dashboard".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.request_timeout = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_text_log_format() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "Text".to_string(),
        };
        assert!(!logging.is_json());
    }
}
