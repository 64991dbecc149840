//! Upstream API error types.

use serde_json::Value;
use thiserror::Error;

use caredesk_core::error::{AppError, ErrorKind};

/// Failure of an upstream API call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The session could not be renewed; the caller must sign in again.
    #[error("session expired")]
    SessionExpired,
    /// The upstream answered with a non-success status.
    #[error("upstream returned {status}: {message}")]
    Api {
        /// HTTP status code of the upstream response.
        status: u16,
        /// Message from the response body, or the status text.
        message: String,
        /// Parsed JSON body, when one was present.
        body: Option<Value>,
    },
    /// The request failed before a response arrived.
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::SessionExpired => {
                AppError::session_expired("session expired; sign in again")
            }
            UpstreamError::Api { status, message, .. } => match status {
                400 => AppError::validation(message),
                401 => AppError::authentication(message),
                403 => AppError::authorization(message),
                404 => AppError::not_found(message),
                _ => AppError::upstream(format!("upstream returned {status}: {message}")),
            },
            UpstreamError::Transport(e) => {
                AppError::with_source(ErrorKind::Upstream, "upstream request failed", e)
            }
        }
    }
}
