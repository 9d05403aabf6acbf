//! Application state management

use crate::{
    api_client::{ApiClient, DashboardSource},
    controller::DashboardController,
    filters::FilterState,
    session::SessionGate,
};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;
use tracing::{debug, info};
use triggerio_core::{Config, Result};

struct SessionEntry {
    controller: Arc<DashboardController>,
    last_seen: Instant,
}

impl SessionEntry {
    fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) >= idle_timeout
    }
}

/// Application state holding configuration, the gate and session controllers
///
/// Sessions are dropped after `server.session_idle_timeout` without a
/// request, and the least recently used ones are dropped once
/// `server.max_sessions` is reached. A dropped session is mounted again,
/// with a fresh fetch, on its next request.
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Token capture and session check
    pub gate: SessionGate,
    /// Where dashboard payloads come from
    pub source: Arc<dyn DashboardSource>,
    sessions: DashMap<String, SessionEntry>,
    idle_timeout: Duration,
    next_sweep: Mutex<Instant>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("gate", &self.gate)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create application state backed by the configured analytics API
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::from_config(&config.api)?;
        Ok(Self::with_source(config, Arc::new(client)))
    }

    /// Create application state with a custom payload source
    #[must_use]
    pub fn with_source(config: Config, source: Arc<dyn DashboardSource>) -> Self {
        let idle_timeout = Duration::from_secs(config.server.session_idle_timeout);
        Self {
            gate: SessionGate::new(&config.auth),
            config,
            source,
            sessions: DashMap::new(),
            next_sweep: Mutex::new(Instant::now() + idle_timeout),
            idle_timeout,
        }
    }

    /// Controller for a session token, creating it on first use
    ///
    /// The flag is true when the controller was just created, which is the
    /// dashboard's mount and calls for the initial fetch. A session that sat
    /// idle past the timeout is replaced by a new one.
    #[must_use]
    pub fn session(&self, token: &str, filters: &FilterState) -> (Arc<DashboardController>, bool) {
        let now = Instant::now();
        if let Some(mut entry) = self.sessions.get_mut(token) {
            if !entry.is_idle(now, self.idle_timeout) {
                entry.last_seen = now;
                return (Arc::clone(&entry.controller), false);
            }
        }

        self.sweep_idle(now);
        self.make_room();

        let mut created = false;
        let controller = {
            let mut entry = self
                .sessions
                .entry(token.to_string())
                .or_insert_with(|| {
                    created = true;
                    self.new_entry(token, filters, now)
                });
            if !created && entry.is_idle(now, self.idle_timeout) {
                *entry = self.new_entry(token, filters, now);
                created = true;
            }
            entry.last_seen = now;
            Arc::clone(&entry.controller)
        };

        if created {
            info!(sessions = self.sessions.len(), "Dashboard session started");
        }
        (controller, created)
    }

    fn new_entry(&self, token: &str, filters: &FilterState, now: Instant) -> SessionEntry {
        SessionEntry {
            controller: Arc::new(DashboardController::new(
                Arc::clone(&self.source),
                token,
                filters.clone(),
            )),
            last_seen: now,
        }
    }

    /// Drop idle sessions, at most once per idle timeout
    fn sweep_idle(&self, now: Instant) {
        {
            let mut next_sweep = self.next_sweep.lock();
            if now < *next_sweep {
                return;
            }
            *next_sweep = now + self.idle_timeout;
        }

        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| !entry.is_idle(now, self.idle_timeout));
        let dropped = before.saturating_sub(self.sessions.len());
        if dropped > 0 {
            info!(dropped, sessions = self.sessions.len(), "Dropped idle dashboard sessions");
        }
    }

    /// At capacity, drop the least recently used tenth of the sessions
    fn make_room(&self) {
        let max = self.config.server.max_sessions;
        let len = self.sessions.len();
        if len < max {
            return;
        }

        let target = max.saturating_sub((max / 10).max(1));
        let mut by_age: Vec<(String, Instant)> = self
            .sessions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().last_seen))
            .collect();
        by_age.sort_by_key(|(_, last_seen)| *last_seen);

        let excess = len.saturating_sub(target);
        for (token, _) in by_age.into_iter().take(excess) {
            self.sessions.remove(&token);
        }
        debug!(
            dropped = excess,
            sessions = self.sessions.len(),
            "Session limit reached, dropped least recently used"
        );
    }

    /// Number of live dashboard sessions
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
#[allow(clippy::field_reassign_with_default)]
mod tests {
    use super::*;
    use crate::filters::DateRange;
    use async_trait::async_trait;
    use triggerio_core::DashboardPayload;

    struct EmptySource;

    #[async_trait]
    impl DashboardSource for EmptySource {
        async fn fetch_dashboard(&self, _: DateRange, _: &str) -> Result<Option<DashboardPayload>> {
            Ok(None)
        }
    }

    #[test]
    fn test_session_created_once_per_token() {
        let state = AppState::with_source(Config::default(), Arc::new(EmptySource));
        let filters = FilterState {
            date_range: DateRange::Last90Days,
            ..FilterState::default()
        };

        let (first, created) = state.session("abc", &filters);
        assert!(created);
        assert_eq!(first.filters().date_range, DateRange::Last90Days);

        let (again, created) = state.session("abc", &FilterState::default());
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &again));

        let (_, created) = state.session("other", &filters);
        assert!(created);
        assert_eq!(state.session_count(), 2);
    }

    fn limited_state(idle_secs: u64, max_sessions: usize) -> AppState {
        let mut config = Config::default();
        config.server.session_idle_timeout = idle_secs;
        config.server.max_sessions = max_sessions;
        AppState::with_source(config, Arc::new(EmptySource))
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_is_remounted() {
        let state = limited_state(60, 100);
        let (first, _) = state.session("abc", &FilterState::default());

        tokio::time::advance(Duration::from_secs(30)).await;
        let (again, created) = state.session("abc", &FilterState::default());
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &again));

        tokio::time::advance(Duration::from_secs(61)).await;
        let (fresh, created) = state.session("abc", &FilterState::default());
        assert!(created);
        assert!(!Arc::ptr_eq(&first, &fresh));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_swept() {
        let state = limited_state(60, 100);
        for i in 0..20 {
            let _ = state.session(&format!("stale-{i}"), &FilterState::default());
        }
        assert_eq!(state.session_count(), 20);

        tokio::time::advance(Duration::from_secs(120)).await;
        let _ = state.session("new", &FilterState::default());

        assert_eq!(state.session_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_forged_tokens_stay_within_limit() {
        let state = limited_state(3600, 50);
        let _ = state.session("regular", &FilterState::default());

        for i in 0..5000 {
            tokio::time::advance(Duration::from_millis(1)).await;
            let _ = state.session(&format!("forged-{i}"), &FilterState::default());
            if i % 10 == 0 {
                let _ = state.session("regular", &FilterState::default());
            }
            assert!(state.session_count() <= 50);
        }

        let (_, created) = state.session("regular", &FilterState::default());
        assert!(!created);
    }
}
