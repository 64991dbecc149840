//! HTTP request handlers.

pub mod auth;
pub mod health;
pub mod pages;

use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse, Response};
use chrono::Utc;

use caredesk_session::cookies;
use caredesk_session::refresh::SessionHandle;

/// Attach renewed session cookies to a response when serving the
/// request rotated the session's tokens.
pub(crate) fn with_renewed_cookies(
    session: &SessionHandle,
    secure: bool,
    response: Response,
) -> Response {
    match session.take_renewed() {
        Some(pair) => {
            let set_cookies = cookies::issue_session_cookies(&pair, Utc::now(), secure)
                .map(|cookie| (SET_COOKIE, cookie));
            (AppendHeaders(set_cookies), response).into_response()
        }
        None => response,
    }
}
