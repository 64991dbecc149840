//! Upstream API payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use caredesk_core::types::{CurrentUser, UserType};
use caredesk_session::tokens::TokenPair;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialsPayload {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshPayload {
    pub refresh_token: String,
}

/// Successful login or refresh response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
    /// Present on login responses, absent on refresh.
    #[serde(default)]
    pub user: Option<UserPayload>,
}

impl TokenGrant {
    /// The grant's tokens as a pair the session layer understands.
    pub fn token_pair(&self) -> TokenPair {
        TokenPair {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            access_expires_at: self.access_expires_at,
            refresh_expires_at: self.refresh_expires_at,
        }
    }
}

/// User object as the upstream reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub user_type: UserType,
}

impl From<UserPayload> for CurrentUser {
    fn from(user: UserPayload) -> Self {
        CurrentUser {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            user_type: user.user_type,
        }
    }
}
