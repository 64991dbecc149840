//! # caredesk-upstream
//!
//! Typed `reqwest` client for the upstream clinic API. Every
//! session-scoped request waits out any in-flight token refresh, sends
//! the current access token, and on a 401 renews the pair through the
//! session's coordinator before retrying exactly once.

pub mod auth;
pub mod client;
pub mod dto;
pub mod error;

pub use client::UpstreamClient;
pub use error::UpstreamError;
