//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use axum::http::HeaderMap;

use caredesk_core::config::GatewayConfig;
use caredesk_core::error::AppError;
use caredesk_session::cookies;
use caredesk_session::refresh::{SessionHandle, SessionRegistry, session_key};
use caredesk_session::tokens::SessionTokens;
use caredesk_upstream::UpstreamClient;

use crate::resolver::{CurrentUserResolver, UserSource};

/// Application state passed to every handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Gateway configuration
    pub config: Arc<GatewayConfig>,

    // ── Upstream ─────────────────────────────────────────────
    /// Upstream API client
    pub upstream: Arc<UpstreamClient>,

    // ── Sessions ─────────────────────────────────────────────
    /// Per-session coordination state
    pub sessions: Arc<SessionRegistry>,
    /// Cached current-user resolution
    pub resolver: Arc<CurrentUserResolver>,

    // ── Runtime ──────────────────────────────────────────────
    /// Server start time, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Build the full state from configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, AppError> {
        let upstream = Arc::new(UpstreamClient::new(&config.upstream)?);
        let source: Arc<dyn UserSource> = upstream.clone();
        let resolver = Arc::new(CurrentUserResolver::new(source, &config.session));
        let sessions = Arc::new(SessionRegistry::new(&config.session));

        Ok(Self {
            config: Arc::new(config),
            upstream,
            sessions,
            resolver,
            started_at: Instant::now(),
        })
    }

    /// Resolve the request's session from its cookies.
    ///
    /// Returns `None` when no decodable refresh token is present. The
    /// access cookie may be absent; the first upstream call then runs
    /// straight into renewal.
    pub async fn session_from_headers(&self, headers: &HeaderMap) -> Option<SessionHandle> {
        let refresh = cookies::get_cookie(headers, cookies::REFRESH_COOKIE)?;
        let key = session_key(refresh)?;
        let access = cookies::get_cookie(headers, cookies::ACCESS_COOKIE).unwrap_or_default();

        let tokens = SessionTokens {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        };
        let state = self.sessions.obtain(key, tokens).await;
        Some(SessionHandle::new(state))
    }

    /// Whether session cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.config.session.secure_cookies
    }
}
