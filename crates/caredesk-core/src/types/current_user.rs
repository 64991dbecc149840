//! The authenticated user as the gateway sees them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserType;

/// Identity resolved for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Stable user id.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Display name, when the account has one.
    pub display_name: Option<String>,
    /// Account type deciding which dashboard area the user belongs to.
    #[serde(rename = "type")]
    pub user_type: UserType,
}

impl CurrentUser {
    /// Root path of this user's dashboard area.
    pub fn dashboard_root(&self) -> &'static str {
        self.user_type.dashboard_root()
    }
}
