//! Request DTOs with validation.

use serde::Deserialize;
use validator::Validate;

/// Body of `POST /auth/sign-in`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}
