//! User account types and their dashboard areas.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The three kinds of accounts the clinic dashboard serves.
///
/// Each type owns exactly one dashboard area; a signed-in user landing
/// outside their own area is sent back to its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Platform administrator.
    Admin,
    /// Clinic staff account.
    Clinic,
    /// Client (patient) account.
    Client,
}

impl UserType {
    /// All account types, in display order.
    pub const ALL: [UserType; 3] = [UserType::Admin, UserType::Clinic, UserType::Client];

    /// Root path of this type's dashboard area.
    pub fn dashboard_root(&self) -> &'static str {
        match self {
            UserType::Admin => "/admin",
            UserType::Clinic => "/clinic",
            UserType::Client => "/client",
        }
    }

    /// Lowercase wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Clinic => "clinic",
            UserType::Client => "client",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserType::Admin),
            "clinic" => Ok(UserType::Clinic),
            "client" => Ok(UserType::Client),
            _ => Err(AppError::validation(format!(
                "Invalid user type: '{s}'. Expected one of: admin, clinic, client"
            ))),
        }
    }
}
