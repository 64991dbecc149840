//! Transparent token renewal driven through the gateway surface.

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{
    TestApp, grant_json, mint_refresh_token, session_cookie_header, user_json,
};

#[tokio::test]
async fn test_stale_access_token_is_renewed_transparently() {
    let app = TestApp::new().await;
    let sid = Uuid::new_v4();
    let refresh = mint_refresh_token(sid, Utc::now() + Duration::days(30));
    let fresh_refresh = mint_refresh_token(sid, Utc::now() + Duration::days(30));

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer stale-access"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_partial_json(json!({ "refresh_token": refresh })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(grant_json("fresh-access", &fresh_refresh, None)),
        )
        .expect(1)
        .mount(&app.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("avery", "admin")))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let cookie = session_cookie_header("stale-access", &refresh);
    let response = app.get("/auth/session", Some(&cookie)).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["data"]["authenticated"], true);
    assert_eq!(response.body["data"]["user"]["username"], "avery");

    let access = response.set_cookie("access_token").expect("access cookie");
    assert!(access.starts_with("access_token=fresh-access"));
    assert!(access.contains("HttpOnly"));
    let renewed = response.set_cookie("refresh_token").expect("refresh cookie");
    assert!(renewed.starts_with(&format!("refresh_token={fresh_refresh}")));
}

#[tokio::test]
async fn test_concurrent_probes_share_one_renewal() {
    let app = TestApp::new().await;
    let sid = Uuid::new_v4();
    let refresh = mint_refresh_token(sid, Utc::now() + Duration::days(30));
    let fresh_refresh = mint_refresh_token(sid, Utc::now() + Duration::days(30));

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer stale-access"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(grant_json("fresh-access", &fresh_refresh, None)),
        )
        .expect(1)
        .mount(&app.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("avery", "admin")))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let cookie = session_cookie_header("stale-access", &refresh);
    let responses = futures::future::join_all(
        (0..3).map(|_| app.get("/auth/session", Some(&cookie))),
    )
    .await;

    for response in responses {
        assert_eq!(response.status, 200);
        assert_eq!(response.body["data"]["authenticated"], true);
    }
}

#[tokio::test]
async fn test_dead_session_on_a_page_clears_cookies_and_redirects() {
    let app = TestApp::new().await;
    let refresh = mint_refresh_token(Uuid::new_v4(), Utc::now() + Duration::days(30));

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Refresh token revoked" })),
        )
        .expect(1)
        .mount(&app.upstream)
        .await;

    let cookie = session_cookie_header("stale-access", &refresh);
    let response = app.get("/admin", Some(&cookie)).await;

    assert_eq!(response.status, 307);
    assert_eq!(response.location(), Some("/sign-in"));
    for name in ["access_token", "refresh_token", "logged_in"] {
        let cleared = response.set_cookie(name).expect("clearing cookie");
        assert!(cleared.contains("Max-Age=0"), "{name} not cleared: {cleared}");
    }
}

#[tokio::test]
async fn test_dead_session_probe_reports_unauthenticated() {
    let app = TestApp::new().await;
    let refresh = mint_refresh_token(Uuid::new_v4(), Utc::now() + Duration::days(30));

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let cookie = session_cookie_header("stale-access", &refresh);
    let response = app.get("/auth/session", Some(&cookie)).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["data"]["authenticated"], false);
    assert!(response.body["data"]["user"].is_null());
}
