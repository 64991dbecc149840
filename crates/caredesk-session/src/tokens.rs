//! Token pair types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An access/refresh token pair with expiries, as issued by the
/// upstream on login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived token authorizing upstream API calls.
    pub access_token: String,
    /// Longer-lived token used to renew the pair.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPair {
    /// The token values without expiries, as a session presents them.
    pub fn session_tokens(&self) -> SessionTokens {
        SessionTokens {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// The token values a session currently presents to the upstream.
///
/// Expiries are not tracked here; requests find out by being answered.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    /// Current access token.
    pub access_token: String,
    /// Current refresh token.
    pub refresh_token: String,
}
