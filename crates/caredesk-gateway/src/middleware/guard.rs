//! Pre-render route protection.
//!
//! Every page navigation is judged from exactly two inputs: the request
//! path and the refresh token's embedded expiry. No upstream call is
//! made here, so navigation stays cheap and the decision is a pure
//! function of (path, cookie, clock).

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use chrono::{DateTime, Utc};
use tracing::debug;

use caredesk_session::claims;
use caredesk_session::cookies::{self, REFRESH_COOKIE};

use crate::state::AppState;

/// Routes reachable without a session.
const PUBLIC_ROUTES: &[&str] = &["/sign-in"];

/// Paths never persisted for post-sign-in restoration.
const LAST_URL_EXCLUDED: &[&str] = &["/forbidden"];

/// Path prefixes the guard does not inspect.
const SKIP_PREFIXES: &[&str] = &["/assets/", "/auth/"];

/// Exact paths the guard does not inspect.
const SKIP_PATHS: &[&str] = &["/healthz", "/favicon.ico"];

/// What the guard decided for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Pass the request through untouched.
    Allow,
    /// Signed-in visitor on a public route: send home, drop any saved
    /// path.
    RedirectHome,
    /// No live session on a private route: send to sign-in, saving the
    /// requested path unless it is excluded.
    RedirectSignIn { save_last_url: Option<String> },
}

/// Decide what to do with a navigation.
///
/// Pure and side-effect free: calling it twice with the same inputs
/// yields the same decision.
pub fn decide(path: &str, refresh_token: Option<&str>, now: DateTime<Utc>) -> GuardDecision {
    if is_skipped(path) {
        return GuardDecision::Allow;
    }

    let authenticated = claims::session_is_live(refresh_token, now);
    let public = PUBLIC_ROUTES.contains(&path);

    match (public, authenticated) {
        // Signed-in visitors have no business on public pages.
        (true, true) => GuardDecision::RedirectHome,
        // Private pages need a live session; remember where the visitor
        // was headed so sign-in can send them back.
        (false, false) => GuardDecision::RedirectSignIn {
            save_last_url: (!LAST_URL_EXCLUDED.contains(&path)).then(|| path.to_string()),
        },
        _ => GuardDecision::Allow,
    }
}

fn is_skipped(path: &str) -> bool {
    SKIP_PATHS.contains(&path) || SKIP_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Axum middleware applying [`decide`] to every request.
pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let refresh = cookies::get_cookie(request.headers(), REFRESH_COOKIE).map(str::to_string);
    let secure = state.secure_cookies();

    match decide(&path, refresh.as_deref(), Utc::now()) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::RedirectHome => {
            debug!(path = %path, "signed-in visitor on public route");
            (
                AppendHeaders([(SET_COOKIE, cookies::clear_last_url(secure))]),
                Redirect::temporary("/"),
            )
                .into_response()
        }
        GuardDecision::RedirectSignIn { save_last_url } => {
            debug!(path = %path, "no live session on private route");
            match save_last_url {
                Some(last_url) => (
                    AppendHeaders([(SET_COOKIE, cookies::save_last_url(&last_url, secure))]),
                    Redirect::temporary("/sign-in"),
                )
                    .into_response(),
                None => Redirect::temporary("/sign-in").into_response(),
            }
        }
    }
}
