//! Gateway auth flow: sign-in, sign-out, session introspection.
//!
//! This is the single authentication path. Every client, page or
//! script, signs in through `POST /auth/sign-in` and out through
//! `POST /auth/sign-out`.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use caredesk_core::error::AppError;
use caredesk_core::types::CurrentUser;
use caredesk_session::cookies::{self, LAST_URL_COOKIE};
use caredesk_session::refresh::session_key;

use crate::dto::request::SignInRequest;
use crate::dto::response::{ApiResponse, SessionResponse, UserResponse};
use crate::handlers::with_renewed_cookies;
use crate::state::AppState;

/// POST /auth/sign-in
///
/// Exchanges credentials upstream, mints the session cookie set, and
/// sends the browser on: to the path it originally wanted (clearing the
/// saved cookie), or to the signed-in user's dashboard root.
pub async fn sign_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SignInRequest>,
) -> Result<Response, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let grant = state.upstream.login(&req.username, &req.password).await?;
    let pair = grant.token_pair();

    // Register under the refresh token's session id so every later
    // request joins the same coordinator.
    let key = session_key(&pair.refresh_token);
    if let Some(key) = &key {
        state
            .sessions
            .obtain(key.clone(), pair.session_tokens())
            .await;
    }

    let user = grant.user.map(CurrentUser::from);
    if let (Some(key), Some(user)) = (&key, &user) {
        state.resolver.prime(key.clone(), user.clone()).await;
    }

    let saved = cookies::get_cookie(&headers, LAST_URL_COOKIE).map(str::to_string);
    let destination = saved
        .clone()
        .or_else(|| user.as_ref().map(|u| u.dashboard_root().to_string()))
        .unwrap_or_else(|| "/".to_string());

    info!(username = %req.username, "sign-in succeeded");

    let secure = state.secure_cookies();
    let mut set_cookies: Vec<_> = cookies::issue_session_cookies(&pair, Utc::now(), secure)
        .into_iter()
        .map(|cookie| (SET_COOKIE, cookie))
        .collect();
    if saved.is_some() {
        set_cookies.push((SET_COOKIE, cookies::clear_last_url(secure)));
    }

    Ok((AppendHeaders(set_cookies), Redirect::to(&destination)).into_response())
}

/// POST /auth/sign-out
///
/// Clears the browser's session no matter what the upstream says; a
/// failed revocation is logged, not surfaced.
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session) = state.session_from_headers(&headers).await {
        if let Err(err) = state.upstream.logout(&session).await {
            warn!(error = %err, "upstream logout failed");
        }
        let key = session.state().session_key().to_string();
        state.resolver.invalidate(&key).await;
        state.sessions.remove(&key).await;
        info!("signed out");
    }

    let set_cookies =
        cookies::clear_session_cookies(state.secure_cookies()).map(|cookie| (SET_COOKIE, cookie));
    (AppendHeaders(set_cookies), Redirect::to("/sign-in")).into_response()
}

/// GET /auth/session
///
/// JSON view of the current session for client scripts. Carries
/// renewed cookies when answering forced a token rotation.
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(session) = state.session_from_headers(&headers).await else {
        return Json(ApiResponse::ok(SessionResponse {
            authenticated: false,
            user: None,
        }))
        .into_response();
    };

    let user = state.resolver.current_user(&session).await;
    let body = SessionResponse {
        authenticated: user.is_some(),
        user: user.map(UserResponse::from),
    };

    with_renewed_cookies(
        &session,
        state.secure_cookies(),
        Json(ApiResponse::ok(body)).into_response(),
    )
}
