// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use flickr_login::config::Config;
use flickr_login::error::AppError;
use flickr_login::models::{AuthorizedResponse, FlickrToken, FlickrUser, RequestToken};
use flickr_login::routes::create_router;
use flickr_login::services::oauth::{Authorization, AuthorizedParams, FlickrOAuth};
use flickr_login::services::{ApiResponse, FlickrTransport};
use flickr_login::session::{self, Session, SessionStore, SESSION_COOKIE};
use flickr_login::AppState;
use std::sync::{Arc, Mutex};

/// OAuth client double that records how it was called.
#[derive(Default)]
pub struct FakeOAuth {
    pub authorized: Option<AuthorizedResponse>,
    pub authorize_calls: Mutex<Vec<String>>,
    pub callback_calls: Mutex<Vec<(AuthorizedParams, Option<RequestToken>)>>,
}

#[allow(dead_code)]
impl FakeOAuth {
    /// Behaves as if the user refused access.
    pub fn declining() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn authorizing(resp: AuthorizedResponse) -> Arc<Self> {
        Arc::new(Self {
            authorized: Some(resp),
            ..Default::default()
        })
    }

    pub fn request_token() -> RequestToken {
        RequestToken {
            oauth_token: "request-token".to_string(),
            oauth_token_secret: "request-secret".to_string(),
        }
    }
}

pub const FAKE_AUTHORIZE_URL: &str =
    "https://www.flickr.com/services/oauth/authorize?oauth_token=request-token&perms=read";

#[async_trait]
impl FlickrOAuth for FakeOAuth {
    async fn authorize(&self, callback: &str) -> Result<Authorization, AppError> {
        self.authorize_calls
            .lock()
            .unwrap()
            .push(callback.to_string());
        Ok(Authorization {
            redirect_url: FAKE_AUTHORIZE_URL.to_string(),
            request_token: Self::request_token(),
        })
    }

    async fn authorized_response(
        &self,
        params: &AuthorizedParams,
        request_token: Option<&RequestToken>,
    ) -> Result<Option<AuthorizedResponse>, AppError> {
        self.callback_calls
            .lock()
            .unwrap()
            .push((params.clone(), request_token.cloned()));
        Ok(self.authorized.clone())
    }
}

/// Transport double returning a canned response.
pub struct FakeTransport {
    pub response: ApiResponse,
    pub requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeTransport {
    pub fn new(response: ApiResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn not_found() -> Arc<Self> {
        Self::new(ApiResponse::TransportError {
            status: 404,
            body: "not found".to_string(),
        })
    }
}

#[async_trait]
impl FlickrTransport for FakeTransport {
    async fn get(&self, url: &str, _token: &FlickrToken) -> ApiResponse {
        self.requests.lock().unwrap().push(url.to_string());
        self.response.clone()
    }
}

/// Create a test app with the given config and collaborators.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app_with(
    config: Config,
    oauth: Arc<dyn FlickrOAuth>,
    transport: Arc<dyn FlickrTransport>,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        sessions: SessionStore::new(config.secure_cookies(), config.session_ttl),
        config,
        oauth,
        flickr_transport: transport,
    });

    (create_router(state.clone()), state)
}

#[allow(dead_code)]
pub fn create_test_app(
    oauth: Arc<dyn FlickrOAuth>,
    transport: Arc<dyn FlickrTransport>,
) -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default(), oauth, transport)
}

#[allow(dead_code)]
pub fn fake_token() -> FlickrToken {
    FlickrToken {
        oauth_token: "token".to_string(),
        oauth_token_secret: "secret".to_string(),
    }
}

#[allow(dead_code)]
pub fn fake_user() -> FlickrUser {
    FlickrUser {
        username: "palotespaco".to_string(),
        user_nsid: "user".to_string(),
    }
}

#[allow(dead_code)]
pub fn fake_authorized_response() -> AuthorizedResponse {
    AuthorizedResponse {
        oauth_token_secret: "secret".to_string(),
        username: "palotespaco".to_string(),
        fullname: Some("paco palotes".to_string()),
        oauth_token: "token".to_string(),
        user_nsid: "user".to_string(),
    }
}

/// Store a logged-in session under `id`.
#[allow(dead_code)]
pub fn seed_logged_in_session(state: &AppState, id: &str) {
    let mut data = Session::default();
    session::set_flickr_credentials(&mut data, &fake_token(), &fake_user()).unwrap();
    state.sessions.insert(id, data);
}

#[allow(dead_code)]
pub fn get(uri: &str, session_id: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(id) = session_id {
        builder = builder.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, id));
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Session id from the response cookie, if a new session was created.
#[allow(dead_code)]
pub fn new_session_id(response: &Response) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE);
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.strip_prefix(prefix.as_str()))
        .map(|rest| rest.split(';').next().unwrap_or_default().to_string())
}
