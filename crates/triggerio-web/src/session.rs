//! Session gate: capture a token handed over in the URL, then require a session
//!
//! The gate runs before any dashboard fetch. A token arriving as a query
//! parameter is persisted under the configured storage key and removed from
//! the visible URL. Without a stored token the caller is sent to the external
//! auth service.

use axum::http::{HeaderMap, header};
use reqwest::Url;
use std::collections::HashMap;
use tracing::{debug, info};
use triggerio_core::config::AuthConfig;

/// Durable client-side storage for the session token
pub trait TokenStore {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value
    fn set(&mut self, key: &str, value: &str);
    /// Delete a value
    fn remove(&mut self, key: &str);
}

/// In-process token store
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    entries: HashMap<String, String>,
}

impl MemoryTokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes that landed; used to check idempotency
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Browser cookie jar seen through one request/response pair
///
/// Reads come from the request's `Cookie` header; writes are queued as
/// `Set-Cookie` values for the response.
#[derive(Debug, Default)]
pub struct CookieTokenStore {
    cookies: HashMap<String, String>,
    max_age_secs: u64,
    set_cookies: Vec<String>,
}

impl CookieTokenStore {
    /// Parse the request cookies
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, max_age_secs: u64) -> Self {
        let cookies = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                let value = urlencoding::decode(value.trim()).ok()?;
                Some((name.trim().to_string(), value.into_owned()))
            })
            .collect();

        Self {
            cookies,
            max_age_secs,
            set_cookies: Vec::new(),
        }
    }

    /// `Set-Cookie` header values produced by writes
    #[must_use]
    pub fn set_cookie_headers(&self) -> &[String] {
        &self.set_cookies
    }
}

impl TokenStore for CookieTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cookies.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.cookies.insert(key.to_string(), value.to_string());
        self.set_cookies.push(format!(
            "{key}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            urlencoding::encode(value),
            self.max_age_secs
        ));
    }

    fn remove(&mut self, key: &str) {
        self.cookies.remove(key);
        self.set_cookies
            .push(format!("{key}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"));
    }
}

/// Outcome of running the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// A session exists; dashboard loading may start
    Proceed {
        /// Session token
        token: String,
        /// The token parameter was removed from the URL
        url_rewritten: bool,
    },
    /// No session; navigate to the auth service
    Redirect {
        /// External auth URL
        location: String,
    },
}

/// One-shot token capture plus session check
#[derive(Debug, Clone)]
pub struct SessionGate {
    storage_key: String,
    token_param: String,
    auth_url: String,
}

impl SessionGate {
    /// Create a gate from the auth configuration
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            storage_key: config.storage_key.clone(),
            token_param: config.token_param.clone(),
            auth_url: config.auth_url.clone(),
        }
    }

    /// Storage key the session token lives under
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Capture a URL token if present, then decide whether to proceed
    ///
    /// Running it again once the token has been stripped is a no-op: no
    /// storage write and no URL change.
    #[must_use]
    pub fn run(&self, url: &mut Url, store: &mut dyn TokenStore) -> GateDecision {
        let url_rewritten = self.capture_url_token(url, store);

        match self.session_token(store) {
            Some(token) => GateDecision::Proceed {
                token,
                url_rewritten,
            },
            None => {
                info!("No session token, redirecting to auth service");
                GateDecision::Redirect {
                    location: self.auth_url.clone(),
                }
            }
        }
    }

    /// Stored token, if it is a usable one
    #[must_use]
    pub fn session_token(&self, store: &dyn TokenStore) -> Option<String> {
        store
            .get(&self.storage_key)
            .filter(|token| !token.trim().is_empty())
    }

    fn capture_url_token(&self, url: &mut Url, store: &mut dyn TokenStore) -> bool {
        let mut token = None;
        let mut kept = Vec::new();
        for (name, value) in url.query_pairs() {
            if name == self.token_param {
                token.get_or_insert_with(|| value.into_owned());
            } else {
                kept.push((name.into_owned(), value.into_owned()));
            }
        }

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return false;
        };

        store.set(&self.storage_key, &token);
        debug!("Captured session token from URL");

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
        true
    }
}

/// Path plus query of a URL, suitable for a same-origin `Location` header
#[must_use]
pub fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}
