//! Response DTOs.

use serde::Serialize;
use uuid::Uuid;

use caredesk_core::types::{CurrentUser, UserType};

/// Standard envelope for successful JSON responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// User as reported to the browser.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub user_type: UserType,
}

impl From<CurrentUser> for UserResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            user_type: user.user_type,
        }
    }
}

/// Body of `GET /auth/session`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Whether the request's cookies resolve to a signed-in user.
    pub authenticated: bool,
    /// The user, when one is resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

/// Body of `GET /healthz`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
