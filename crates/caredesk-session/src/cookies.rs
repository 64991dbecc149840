//! Session cookie names, parsing, and construction.
//!
//! The gateway speaks plain `Set-Cookie` strings; values are built here
//! so every flow issues identical attributes.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use chrono::{DateTime, Utc};

use crate::tokens::TokenPair;

/// Access token cookie (HttpOnly).
pub const ACCESS_COOKIE: &str = "access_token";
/// Refresh token cookie (HttpOnly).
pub const REFRESH_COOKIE: &str = "refresh_token";
/// Marker readable by client scripts advertising that a session exists.
pub const LOGGED_IN_COOKIE: &str = "logged_in";
/// Path the visitor was headed to before being sent to sign-in.
pub const LAST_URL_COOKIE: &str = "lastUrl";

/// How long a saved path survives before the browser drops it.
const LAST_URL_TTL_SECONDS: i64 = 600;

/// Extract a cookie value from request headers.
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|part| {
            let (key, value) = part.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}

/// `Set-Cookie` value for an HttpOnly session cookie.
pub fn session_cookie(name: &str, value: &str, max_age_seconds: i64, secure: bool) -> String {
    format!(
        "{name}={value}; HttpOnly; SameSite=Strict; Path=/; Max-Age={max_age_seconds}{}",
        secure_suffix(secure)
    )
}

/// `Set-Cookie` value for a cookie client scripts may read.
pub fn readable_cookie(name: &str, value: &str, max_age_seconds: i64, secure: bool) -> String {
    format!(
        "{name}={value}; SameSite=Strict; Path=/; Max-Age={max_age_seconds}{}",
        secure_suffix(secure)
    )
}

/// `Set-Cookie` value removing a cookie.
pub fn clearing_cookie(name: &str, secure: bool) -> String {
    format!(
        "{name}=; SameSite=Strict; Path=/; Max-Age=0{}",
        secure_suffix(secure)
    )
}

fn secure_suffix(secure: bool) -> &'static str {
    if secure { "; Secure" } else { "" }
}

/// `Set-Cookie` values issuing the full session cookie set.
///
/// Max-Age values derive from the pair's expiries; the `logged_in`
/// marker follows the refresh token's lifetime.
pub fn issue_session_cookies(pair: &TokenPair, now: DateTime<Utc>, secure: bool) -> [String; 3] {
    let access_age = (pair.access_expires_at - now).num_seconds().max(0);
    let refresh_age = (pair.refresh_expires_at - now).num_seconds().max(0);
    [
        session_cookie(ACCESS_COOKIE, &pair.access_token, access_age, secure),
        session_cookie(REFRESH_COOKIE, &pair.refresh_token, refresh_age, secure),
        readable_cookie(LOGGED_IN_COOKIE, "true", refresh_age, secure),
    ]
}

/// `Set-Cookie` values removing the full session cookie set.
pub fn clear_session_cookies(secure: bool) -> [String; 3] {
    [
        clearing_cookie(ACCESS_COOKIE, secure),
        clearing_cookie(REFRESH_COOKIE, secure),
        clearing_cookie(LOGGED_IN_COOKIE, secure),
    ]
}

/// `Set-Cookie` value persisting the pre-sign-in path.
pub fn save_last_url(path: &str, secure: bool) -> String {
    readable_cookie(LAST_URL_COOKIE, path, LAST_URL_TTL_SECONDS, secure)
}

/// `Set-Cookie` value clearing the saved path.
pub fn clear_last_url(secure: bool) -> String {
    clearing_cookie(LAST_URL_COOKIE, secure)
}
