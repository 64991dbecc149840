//! Session and cookie configuration.

use serde::Deserialize;

/// Settings governing per-session state and the cookies that carry it.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// How long a resolved current-user stays fresh, in minutes.
    #[serde(default = "default_user_staleness_minutes")]
    pub user_staleness_minutes: u64,
    /// Idle time after which per-session state is evicted, in minutes.
    #[serde(default = "default_idle_eviction_minutes")]
    pub idle_eviction_minutes: u64,
    /// Upper bound on concurrently tracked sessions.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
    /// Whether to mark session cookies `Secure`.
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_staleness_minutes: default_user_staleness_minutes(),
            idle_eviction_minutes: default_idle_eviction_minutes(),
            max_sessions: default_max_sessions(),
            secure_cookies: false,
        }
    }
}

fn default_user_staleness_minutes() -> u64 {
    5
}

fn default_idle_eviction_minutes() -> u64 {
    30
}

fn default_max_sessions() -> u64 {
    10_000
}
