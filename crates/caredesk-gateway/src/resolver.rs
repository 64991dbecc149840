//! Cached current-user resolution.
//!
//! Pages decide what to render from the session's user. Resolving one
//! costs an upstream call, so results are cached per session for a
//! short staleness window, and concurrent lookups for the same session
//! collapse into a single fetch.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::warn;

use caredesk_core::config::SessionConfig;
use caredesk_core::error::AppError;
use caredesk_core::types::CurrentUser;
use caredesk_session::SessionHandle;
use caredesk_upstream::{UpstreamClient, UpstreamError};

/// Source of the authenticated user's identity.
///
/// Seam between the resolver and the upstream so tests can substitute
/// a canned user.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// The user this session belongs to, or `None` when the session
    /// does not authenticate anyone.
    async fn fetch_current_user(
        &self,
        session: &SessionHandle,
    ) -> Result<Option<CurrentUser>, AppError>;
}

#[async_trait]
impl UserSource for UpstreamClient {
    async fn fetch_current_user(
        &self,
        session: &SessionHandle,
    ) -> Result<Option<CurrentUser>, AppError> {
        match self.me(session).await {
            Ok(user) => Ok(Some(user.into())),
            // An unrenewable or rejected session authenticates nobody.
            Err(UpstreamError::SessionExpired) => Ok(None),
            Err(UpstreamError::Api { status: 401, .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Resolves and caches the current user per session.
pub struct CurrentUserResolver {
    source: Arc<dyn UserSource>,
    cache: Cache<String, Option<CurrentUser>>,
}

impl CurrentUserResolver {
    pub fn new(source: Arc<dyn UserSource>, config: &SessionConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_sessions)
            .time_to_live(Duration::from_secs(config.user_staleness_minutes * 60))
            .build();
        Self { source, cache }
    }

    /// The current user for the session, from cache or one fetch.
    ///
    /// Definite answers (a user, or an authoritative "nobody") are
    /// cached for the staleness window. A failed fetch reads as `None`
    /// for this call only and is not cached, and no retry is attempted.
    pub async fn current_user(&self, session: &SessionHandle) -> Option<CurrentUser> {
        let key = session.state().session_key().to_string();
        let fetched = self
            .cache
            .try_get_with(key, async { self.source.fetch_current_user(session).await })
            .await;

        match fetched {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "current-user fetch failed");
                None
            }
        }
    }

    /// Seed the cache with a user already known, e.g. from a login
    /// response.
    pub async fn prime(&self, session_key: String, user: CurrentUser) {
        self.cache.insert(session_key, Some(user)).await;
    }

    /// Drop the cached user for a session (sign-out).
    pub async fn invalidate(&self, session_key: &str) {
        self.cache.invalidate(session_key).await;
    }
}

impl std::fmt::Debug for CurrentUserResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUserResolver")
            .field("cached_users", &self.cache.entry_count())
            .finish()
    }
}
