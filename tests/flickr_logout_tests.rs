// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Logout (revoke access) tests.

use axum::http::StatusCode;
use flickr_login::config::Config;
use flickr_login::session::{Session, FLICKR_TOKEN_KEY, FLICKR_USER_KEY};
use tower::ServiceExt;

mod common;
use common::{FakeOAuth, FakeTransport};

#[tokio::test]
async fn test_logout_removes_token_and_user_from_session() {
    let (app, state) = common::create_test_app(FakeOAuth::declining(), FakeTransport::not_found());
    common::seed_logged_in_session(&state, "sess");

    let before = state.sessions.get("sess").unwrap();
    assert!(before.contains_key(FLICKR_TOKEN_KEY));
    assert!(before.contains_key(FLICKR_USER_KEY));

    app.oneshot(common::get("/flickr/revoke-access", Some("sess")))
        .await
        .unwrap();

    // Nothing else was stored, so the whole session is gone.
    assert!(state.sessions.get("sess").is_none());
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let (app, state) = common::create_test_app(FakeOAuth::declining(), FakeTransport::not_found());

    let mut only_token = Session::default();
    only_token
        .insert(FLICKR_TOKEN_KEY, &common::fake_token())
        .unwrap();
    only_token.insert("other", &1).unwrap();
    state.sessions.insert("only-token", only_token);
    state.sessions.insert("empty", Session::default());

    for id in ["only-token", "empty"] {
        let response = app
            .clone()
            .oneshot(common::get("/flickr/revoke-access", Some(id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

        let after = state.sessions.get(id).unwrap_or_default();
        assert!(!after.contains_key(FLICKR_TOKEN_KEY));
        assert!(!after.contains_key(FLICKR_USER_KEY));
    }

    assert!(state.sessions.get("only-token").unwrap().contains_key("other"));
}

#[tokio::test]
async fn test_logout_without_session() {
    let (app, _) = common::create_test_app(FakeOAuth::declining(), FakeTransport::not_found());

    let response = app
        .oneshot(common::get("/flickr/revoke-access", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(common::location(&response), "/");
    assert!(common::new_session_id(&response).is_none());
}

#[tokio::test]
async fn test_logout_redirects_to_url_specified_by_next_param() {
    let (app, _) = common::create_test_app(FakeOAuth::declining(), FakeTransport::not_found());

    let response = app
        .oneshot(common::get(
            "/flickr/revoke-access?next=http://mynext_url",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(common::location(&response), "http://mynext_url");
}

#[tokio::test]
async fn test_logout_next_with_tab_cannot_escape_allow_list() {
    let mut config = Config::test_default();
    config.allowed_redirect_hosts = vec!["crowd.example.org".to_string()];
    let (app, _) =
        common::create_test_app_with(config, FakeOAuth::declining(), FakeTransport::not_found());

    let response = app
        .oneshot(common::get(
            "/flickr/revoke-access?next=/%09/evil.example/phish",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(common::location(&response), "/");
}
