//! Upstream API configuration.

use serde::Deserialize;

/// Connection settings for the upstream clinic API.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the upstream API, e.g. `https://api.example.com`.
    ///
    /// Required. Startup fails when it is absent from every source.
    pub base_url: String,
    /// TCP connect timeout in seconds.
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
    /// Total per-request timeout in seconds.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_connect_timeout_seconds() -> u64 {
    5
}

fn default_request_timeout_seconds() -> u64 {
    30
}
