//! Sign-in, sign-out, and session introspection end to end.

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{
    TestApp, grant_json, mint_refresh_token, session_cookie_header, user_json,
};

#[tokio::test]
async fn test_sign_in_redirects_to_the_dashboard_root() {
    let app = TestApp::new().await;
    let refresh = mint_refresh_token(Uuid::new_v4(), Utc::now() + Duration::days(30));

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({ "username": "avery" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(grant_json(
                "access-1",
                &refresh,
                Some(user_json("avery", "admin")),
            )),
        )
        .expect(1)
        .mount(&app.upstream)
        .await;

    let response = app
        .post_json(
            "/auth/sign-in",
            json!({ "username": "avery", "password": "hunter2" }),
            None,
        )
        .await;

    assert_eq!(response.status, 303);
    assert_eq!(response.location(), Some("/admin"));

    let access = response.set_cookie("access_token").expect("access cookie");
    assert!(access.starts_with("access_token=access-1"));
    assert!(access.contains("HttpOnly"));
    assert!(response.set_cookie("refresh_token").is_some());
    let logged_in = response.set_cookie("logged_in").expect("logged_in cookie");
    assert!(logged_in.starts_with("logged_in=true"));
    assert!(!logged_in.contains("HttpOnly"));
    assert!(response.set_cookie("lastUrl").is_none());
}

#[tokio::test]
async fn test_sign_in_returns_to_the_saved_destination() {
    let app = TestApp::new().await;
    let refresh = mint_refresh_token(Uuid::new_v4(), Utc::now() + Duration::days(30));

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(grant_json(
                "access-1",
                &refresh,
                Some(user_json("maria", "clinic")),
            )),
        )
        .expect(1)
        .mount(&app.upstream)
        .await;

    let response = app
        .post_json(
            "/auth/sign-in",
            json!({ "username": "maria", "password": "secret" }),
            Some("lastUrl=/clinic/reports/42"),
        )
        .await;

    assert_eq!(response.status, 303);
    assert_eq!(response.location(), Some("/clinic/reports/42"));
    let last_url = response.set_cookie("lastUrl").expect("lastUrl cookie");
    assert!(last_url.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_sign_in_with_bad_credentials_is_unauthorized() {
    let app = TestApp::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "Invalid username or password" })),
        )
        .expect(1)
        .mount(&app.upstream)
        .await;

    let response = app
        .post_json(
            "/auth/sign-in",
            json!({ "username": "avery", "password": "wrong" }),
            None,
        )
        .await;

    assert_eq!(response.status, 401);
    assert_eq!(response.body["error"], "AUTHENTICATION");
    assert_eq!(response.body["message"], "Invalid username or password");
    assert!(response.set_cookie("access_token").is_none());
}

#[tokio::test]
async fn test_sign_in_rejects_an_empty_username() {
    let app = TestApp::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.upstream)
        .await;

    let response = app
        .post_json(
            "/auth/sign-in",
            json!({ "username": "", "password": "secret" }),
            None,
        )
        .await;

    assert_eq!(response.status, 400);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_sign_out_revokes_upstream_and_clears_cookies() {
    let app = TestApp::new().await;
    let refresh = mint_refresh_token(Uuid::new_v4(), Utc::now() + Duration::days(30));

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("authorization", "Bearer ok-access"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let cookie = session_cookie_header("ok-access", &refresh);
    let response = app.request("POST", "/auth/sign-out", None, Some(&cookie)).await;

    assert_eq!(response.status, 303);
    assert_eq!(response.location(), Some("/sign-in"));
    for name in ["access_token", "refresh_token", "logged_in"] {
        let cleared = response.set_cookie(name).expect("clearing cookie");
        assert!(cleared.contains("Max-Age=0"), "{name} not cleared: {cleared}");
    }
}

#[tokio::test]
async fn test_sign_out_without_a_session_still_clears_cookies() {
    let app = TestApp::new().await;

    let response = app.request("POST", "/auth/sign-out", None, None).await;

    assert_eq!(response.status, 303);
    assert_eq!(response.location(), Some("/sign-in"));
    assert!(response.set_cookie("access_token").is_some());
}

#[tokio::test]
async fn test_session_probe_without_cookies_is_anonymous() {
    let app = TestApp::new().await;

    let response = app.get("/auth/session", None).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["authenticated"], false);
    assert!(response.body["data"]["user"].is_null());
}

#[tokio::test]
async fn test_health_reports_version_and_uptime() {
    let app = TestApp::new().await;

    let response = app.get("/healthz", None).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(response.body["data"]["uptime_seconds"].is_u64());
}
