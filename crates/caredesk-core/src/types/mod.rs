//! Identity types shared across the gateway.

mod current_user;
mod user_type;

pub use current_user::CurrentUser;
pub use user_type::UserType;
