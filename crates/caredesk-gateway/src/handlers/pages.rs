//! Server-rendered pages.
//!
//! Each dashboard area checks the resolved user against its own type
//! before rendering; a user landing in the wrong area is forwarded to
//! their own dashboard root.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};

use caredesk_core::types::{CurrentUser, UserType};
use caredesk_session::cookies;
use caredesk_session::refresh::SessionHandle;

use crate::handlers::with_renewed_cookies;
use crate::state::AppState;

const SIGN_OUT_FORM: &str = "<form method=\"post\" action=\"/auth/sign-out\"><button type=\"submit\">Sign out</button></form>";

/// GET / — landing page; forwards signed-in users to their area.
pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match require_user(&state, &headers, &UserType::ALL).await {
        Ok((user, session)) => with_renewed_cookies(
            &session,
            state.secure_cookies(),
            Redirect::temporary(user.dashboard_root()).into_response(),
        ),
        Err(response) => response,
    }
}

/// GET /sign-in — the only public page.
pub async fn sign_in() -> Html<String> {
    let body = r#"<h1>Sign in</h1>
<form id="sign-in" method="post" action="/auth/sign-in">
  <label>Username <input name="username" autocomplete="username" required></label>
  <label>Password <input name="password" type="password" autocomplete="current-password" required></label>
  <button type="submit">Sign in</button>
  <p id="error" hidden></p>
</form>
<script>
document.getElementById('sign-in').addEventListener('submit', async (event) => {
  event.preventDefault();
  const form = new FormData(event.target);
  const response = await fetch('/auth/sign-in', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(Object.fromEntries(form)),
  });
  if (response.redirected) {
    window.location.assign(response.url);
    return;
  }
  const body = await response.json().catch(() => null);
  const error = document.getElementById('error');
  error.textContent = body && body.message ? body.message : 'Sign-in failed';
  error.hidden = false;
});
</script>"#;
    Html(page_shell("Sign in", body))
}

/// GET /admin
pub async fn admin(State(state): State<AppState>, headers: HeaderMap) -> Response {
    dashboard(&state, &headers, UserType::Admin, "Administration").await
}

/// GET /clinic
pub async fn clinic(State(state): State<AppState>, headers: HeaderMap) -> Response {
    dashboard(&state, &headers, UserType::Clinic, "Clinic dashboard").await
}

/// GET /client
pub async fn client(State(state): State<AppState>, headers: HeaderMap) -> Response {
    dashboard(&state, &headers, UserType::Client, "My care").await
}

/// GET /forbidden
pub async fn forbidden() -> Html<String> {
    Html(page_shell(
        "Forbidden",
        "<h1>Forbidden</h1>\n<p>You do not have access to this page.</p>",
    ))
}

async fn dashboard(
    state: &AppState,
    headers: &HeaderMap,
    required: UserType,
    title: &str,
) -> Response {
    match require_user(state, headers, &[required]).await {
        Ok((user, session)) => {
            let greeting = escape_html(user.display_name.as_deref().unwrap_or(&user.username));
            let body =
                format!("<h1>{title}</h1>\n<p>Signed in as {greeting}.</p>\n{SIGN_OUT_FORM}");
            with_renewed_cookies(
                &session,
                state.secure_cookies(),
                Html(page_shell(title, &body)).into_response(),
            )
        }
        Err(response) => response,
    }
}

/// Resolve the signed-in user and check them against the allowed types.
///
/// A missing session redirects to sign-in. A dead session (live-looking
/// cookie, but nothing upstream) also clears the session cookies so the
/// route guard stops treating the browser as signed in. A user of the
/// wrong type is forwarded to their own dashboard root.
async fn require_user(
    state: &AppState,
    headers: &HeaderMap,
    allowed: &[UserType],
) -> Result<(CurrentUser, SessionHandle), Response> {
    let Some(session) = state.session_from_headers(headers).await else {
        return Err(Redirect::temporary("/sign-in").into_response());
    };

    let Some(user) = state.resolver.current_user(&session).await else {
        let clearing = cookies::clear_session_cookies(state.secure_cookies())
            .map(|cookie| (SET_COOKIE, cookie));
        return Err((AppendHeaders(clearing), Redirect::temporary("/sign-in")).into_response());
    };

    if !allowed.contains(&user.user_type) {
        return Err(Redirect::temporary(user.dashboard_root()).into_response());
    }

    Ok((user, session))
}

fn page_shell(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{title} · CareDesk</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

/// Escape user-supplied text interpolated into page HTML.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
