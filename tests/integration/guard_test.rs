//! Route guard behavior across the full router.

use chrono::{Duration, Utc};
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{TestApp, mint_refresh_token, session_cookie_header, user_json};

#[tokio::test]
async fn test_private_route_with_live_session_is_served() {
    let app = TestApp::new().await;
    let refresh = mint_refresh_token(Uuid::new_v4(), Utc::now() + Duration::hours(8));

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer live-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("avery", "admin")))
        .mount(&app.upstream)
        .await;

    let cookie = session_cookie_header("live-access", &refresh);
    let response = app.get("/admin", Some(&cookie)).await;

    assert_eq!(response.status, 200);
    let content_type = response
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_expired_session_redirects_and_saves_last_url() {
    let app = TestApp::new().await;
    let refresh = mint_refresh_token(Uuid::new_v4(), Utc::now() - Duration::minutes(1));

    let cookie = session_cookie_header("stale-access", &refresh);
    let response = app.get("/admin", Some(&cookie)).await;

    assert_eq!(response.status, 307);
    assert_eq!(response.location(), Some("/sign-in"));
    let last_url = response.set_cookie("lastUrl").expect("lastUrl cookie");
    assert!(last_url.starts_with("lastUrl=/admin"));
    assert!(last_url.contains("Max-Age=600"));
}

#[tokio::test]
async fn test_unauthenticated_sign_in_page_is_served() {
    let app = TestApp::new().await;

    let response = app.get("/sign-in", None).await;

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_live_session_on_sign_in_redirects_home() {
    let app = TestApp::new().await;
    let refresh = mint_refresh_token(Uuid::new_v4(), Utc::now() + Duration::hours(8));

    let cookie = session_cookie_header("live-access", &refresh);
    let response = app.get("/sign-in", Some(&cookie)).await;

    assert_eq!(response.status, 307);
    assert_eq!(response.location(), Some("/"));
    let last_url = response.set_cookie("lastUrl").expect("lastUrl cookie");
    assert!(last_url.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_forbidden_is_never_saved_as_last_url() {
    let app = TestApp::new().await;
    let refresh = mint_refresh_token(Uuid::new_v4(), Utc::now() - Duration::minutes(1));

    let cookie = session_cookie_header("stale-access", &refresh);
    let response = app.get("/forbidden", Some(&cookie)).await;

    assert_eq!(response.status, 307);
    assert_eq!(response.location(), Some("/sign-in"));
    assert!(response.set_cookie("lastUrl").is_none());
}

#[tokio::test]
async fn test_malformed_refresh_cookie_is_treated_as_expired() {
    let app = TestApp::new().await;

    let cookie = session_cookie_header("live-access", "not-a-jwt");
    let response = app.get("/admin", Some(&cookie)).await;

    assert_eq!(response.status, 307);
    assert_eq!(response.location(), Some("/sign-in"));
}

#[tokio::test]
async fn test_health_check_bypasses_the_guard() {
    let app = TestApp::new().await;

    let response = app.get("/healthz", None).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_asset_paths_are_not_redirected() {
    let app = TestApp::new().await;

    let response = app.get("/assets/app.css", None).await;

    assert_eq!(response.status, 404);
    assert!(response.location().is_none());
}
