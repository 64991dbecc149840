//! Layered configuration loading.
//!
//! Values are merged in order: `config/default.toml`, then
//! `config/{env}.toml`, then environment variables prefixed with
//! `CAREDESK_` (double underscore separates nesting, e.g.
//! `CAREDESK_UPSTREAM__BASE_URL`). Later sources win.

mod logging;
mod server;
mod session;
mod upstream;

pub use logging::LoggingConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;
pub use upstream::UpstreamConfig;

use serde::Deserialize;

use crate::error::AppError;

/// Root configuration for the gateway.
///
/// `upstream.base_url` has no default; loading fails without it.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream API settings.
    pub upstream: UpstreamConfig,
    /// Session and cookie settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Load configuration for the given environment name.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CAREDESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("failed to load configuration: {e}")))?;

        settings
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("invalid configuration: {e}")))
    }
}
