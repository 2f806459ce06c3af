// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flickr login, callback, logout and album routes.

use axum::{
    extract::{Query, State},
    http::HeaderValue,
    response::Redirect,
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{AlbumInfo, RequestToken};
use crate::services::oauth::AuthorizedParams;
use crate::services::FlickrClient;
use crate::session::{self, NEXT_KEY, REQUEST_TOKEN_KEY};
use crate::AppState;

/// Where Flickr sends the user back after authorization.
pub const CALLBACK_PATH: &str = "/flickr/oauth-authorized";

/// Redirect target when no `next` was given.
const DEFAULT_NEXT: &str = "/";

/// Host that relative `next` paths are resolved against.
const RELATIVE_HOST: &str = "relative.invalid";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/flickr/", get(login))
        .route(CALLBACK_PATH, get(oauth_authorized))
        .route("/flickr/revoke-access", get(logout))
        .route("/flickr/albums", get(albums))
}

#[derive(Deserialize)]
pub struct NextParams {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    oauth_token: Option<String>,
    #[serde(default)]
    oauth_verifier: Option<String>,
    #[serde(default)]
    denied: Option<String>,
}

impl CallbackParams {
    fn authorized_params(&self) -> AuthorizedParams {
        AuthorizedParams {
            oauth_token: self.oauth_token.clone(),
            oauth_verifier: self.oauth_verifier.clone(),
            denied: self.denied.clone(),
        }
    }
}

/// Start the OAuth handshake - redirect to Flickr.
async fn login(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NextParams>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let authorization = state.oauth.authorize(CALLBACK_PATH).await?;

    let mut loaded = state.sessions.load(&jar)?;
    loaded
        .data
        .insert(REQUEST_TOKEN_KEY, &authorization.request_token)?;
    match params.next {
        Some(next) => loaded.data.insert(NEXT_KEY, &next)?,
        None => {
            loaded.data.remove(NEXT_KEY);
        }
    }
    let jar = state.sessions.save(jar, loaded);

    tracing::info!("Redirecting to Flickr for authorization");

    Ok((jar, Redirect::temporary(&authorization.redirect_url)))
}

/// OAuth callback - store token and user in the session, then follow `next`.
async fn oauth_authorized(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let mut loaded = state.sessions.load(&jar)?;
    let request_token: Option<RequestToken> = loaded.data.take(REQUEST_TOKEN_KEY);
    let remembered_next: Option<String> = loaded.data.take(NEXT_KEY);

    let response = state
        .oauth
        .authorized_response(&params.authorized_params(), request_token.as_ref())
        .await?;

    match response {
        Some(resp) => {
            let (token, user) = resp.into_session_parts();
            session::set_flickr_credentials(&mut loaded.data, &token, &user)?;
            tracing::info!(username = %user.username, "Flickr login successful");
        }
        None => {
            tracing::info!("No Flickr authorization, session left unchanged");
        }
    }

    let target = resolve_next(
        params.next.as_deref().or(remembered_next.as_deref()),
        &state.config.allowed_redirect_hosts,
    );
    let jar = state.sessions.save(jar, loaded);

    Ok((jar, Redirect::temporary(&target)))
}

/// Forget the Flickr login and follow `next`.
async fn logout(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NextParams>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let mut loaded = state.sessions.load(&jar)?;
    session::clear_flickr_credentials(&mut loaded.data);
    let jar = state.sessions.save(jar, loaded);

    let target = resolve_next(params.next.as_deref(), &state.config.allowed_redirect_hosts);

    Ok((jar, Redirect::temporary(&target)))
}

/// Albums of the logged-in Flickr user.
async fn albums(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Vec<AlbumInfo>>> {
    let loaded = state.sessions.load(&jar)?;
    let (Some(token), Some(user)) = (
        session::get_flickr_token(&loaded.data),
        session::get_flickr_user(&loaded.data),
    ) else {
        return Err(AppError::Unauthorized);
    };

    let client = FlickrClient::new(state.flickr_transport.clone(), token, user);
    Ok(Json(client.get_own_albums().await))
}

/// Pick the redirect target for `next`.
///
/// With an empty allow-list any value is used verbatim. Otherwise absolute
/// URLs must name an allowed host, and relative paths must still resolve to
/// this site once browsers strip tabs and newlines from them.
pub fn resolve_next(next: Option<&str>, allowed_hosts: &[String]) -> String {
    let Some(next) = next.filter(|n| !n.is_empty()) else {
        return DEFAULT_NEXT.to_string();
    };

    if HeaderValue::from_str(next).is_err() {
        tracing::warn!("Rejected `next` that is not a valid Location value");
        return DEFAULT_NEXT.to_string();
    }

    if allowed_hosts.is_empty() {
        return next.to_string();
    }

    if next.chars().any(|c| c.is_ascii_control()) {
        tracing::warn!("Rejected `next` containing control characters");
        return DEFAULT_NEXT.to_string();
    }

    if next.starts_with('/') {
        let local = Url::parse(&format!("http://{}/", RELATIVE_HOST))
            .and_then(|base| base.join(next))
            .is_ok_and(|u| u.host_str() == Some(RELATIVE_HOST));
        if local {
            return next.to_string();
        }
    }

    let allowed = Url::parse(next)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
        .is_some_and(|host| allowed_hosts.iter().any(|a| *a == host));

    if allowed {
        next.to_string()
    } else {
        tracing::warn!(next = %next, "Rejected redirect to host outside allow-list");
        DEFAULT_NEXT.to_string()
    }
}
