//! Registry of live sessions and their coordination state.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::RwLock;

use caredesk_core::config::SessionConfig;

use crate::claims;
use crate::refresh::coordinator::RefreshCoordinator;
use crate::tokens::{SessionTokens, TokenPair};

/// Registry key for a refresh token: its `sid` claim, or the token
/// itself when the claim is absent.
///
/// Returns `None` for tokens that do not decode at all.
pub fn session_key(refresh_token: &str) -> Option<String> {
    let decoded = claims::decode_unverified(refresh_token)?;
    Some(
        decoded
            .sid
            .map(|sid| sid.to_string())
            .unwrap_or_else(|| refresh_token.to_string()),
    )
}

/// Shared state for one browser session.
pub struct SessionState {
    /// Registry key this state is stored under.
    key: String,
    /// Token values the session currently presents; rotate on refresh.
    tokens: RwLock<SessionTokens>,
    /// Refresh coordination for this session.
    pub coordinator: RefreshCoordinator,
}

impl SessionState {
    pub fn new(key: impl Into<String>, tokens: SessionTokens) -> Self {
        Self {
            key: key.into(),
            tokens: RwLock::new(tokens),
            coordinator: RefreshCoordinator::new(),
        }
    }

    /// Registry key of this session.
    pub fn session_key(&self) -> &str {
        &self.key
    }

    /// Snapshot of the current token values.
    pub async fn current_tokens(&self) -> SessionTokens {
        self.tokens.read().await.clone()
    }

    /// Replace the token values after a renewal.
    pub async fn store_tokens(&self, tokens: SessionTokens) {
        *self.tokens.write().await = tokens;
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("key", &self.key)
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

/// Per-request view of a session.
///
/// Wraps the shared state and records a renewal happening while the
/// request is served, so the handler can re-issue cookies on the way
/// out.
pub struct SessionHandle {
    state: Arc<SessionState>,
    renewed: Mutex<Option<TokenPair>>,
}

impl SessionHandle {
    pub fn new(state: Arc<SessionState>) -> Self {
        Self {
            state,
            renewed: Mutex::new(None),
        }
    }

    /// The shared session state behind this handle.
    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    /// Snapshot of the session's current token values.
    pub async fn current_tokens(&self) -> SessionTokens {
        self.state.current_tokens().await
    }

    /// Note that the session's tokens were renewed during this request.
    pub fn record_renewal(&self, pair: TokenPair) {
        *self.lock_renewed() = Some(pair);
    }

    /// Take the renewal recorded for this request, if any.
    pub fn take_renewed(&self) -> Option<TokenPair> {
        self.lock_renewed().take()
    }

    fn lock_renewed(&self) -> std::sync::MutexGuard<'_, Option<TokenPair>> {
        self.renewed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("state", &self.state)
            .finish()
    }
}

/// All sessions the gateway currently tracks.
///
/// Entries are evicted after sitting idle for the configured window;
/// a returning browser re-creates its entry from cookies.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Cache<String, Arc<SessionState>>,
}

impl SessionRegistry {
    pub fn new(config: &SessionConfig) -> Self {
        let sessions = Cache::builder()
            .max_capacity(config.max_sessions)
            .time_to_idle(Duration::from_secs(config.idle_eviction_minutes * 60))
            .build();
        Self { sessions }
    }

    /// Look up or create the state for a session.
    ///
    /// Creation is atomic per key: two concurrent requests for the same
    /// session get the same state, and with it the same coordinator.
    /// `tokens` only seeds a newly created entry.
    pub async fn obtain(&self, key: String, tokens: SessionTokens) -> Arc<SessionState> {
        self.sessions
            .get_with(key.clone(), async move {
                Arc::new(SessionState::new(key, tokens))
            })
            .await
    }

    /// Look up existing state without creating it.
    pub async fn get(&self, key: &str) -> Option<Arc<SessionState>> {
        self.sessions.get(key).await
    }

    /// Drop a session's state (sign-out).
    pub async fn remove(&self, key: &str) {
        self.sessions.invalidate(key).await;
    }
}
