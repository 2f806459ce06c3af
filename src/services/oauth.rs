// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flickr OAuth 1.0a handshake.
//!
//! Handles:
//! - Request token acquisition and the provider authorize URL
//! - Exchange of the verifier for an access token
//! - Treating refusals and provider errors as "no authorization"

use crate::error::AppError;
use crate::models::{AuthorizedResponse, RequestToken};
use crate::services::signing::{OAuth1Signer, TokenCredentials};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

pub const REQUEST_TOKEN_URL: &str = "https://www.flickr.com/services/oauth/request_token";
pub const AUTHORIZE_URL: &str = "https://www.flickr.com/services/oauth/authorize";
pub const ACCESS_TOKEN_URL: &str = "https://www.flickr.com/services/oauth/access_token";

/// Outcome of starting the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    /// Provider page the browser is sent to
    pub redirect_url: String,
    /// Must be kept until the callback arrives
    pub request_token: RequestToken,
}

/// Query parameters Flickr appends to the callback URL.
#[derive(Debug, Clone, Default)]
pub struct AuthorizedParams {
    pub oauth_token: Option<String>,
    pub oauth_verifier: Option<String>,
    pub denied: Option<String>,
}

/// OAuth client used by the login views.
#[async_trait]
pub trait FlickrOAuth: Send + Sync {
    /// Begin authorization; Flickr will send the user back to `callback`.
    async fn authorize(&self, callback: &str) -> Result<Authorization, AppError>;

    /// Complete authorization from the callback request.
    ///
    /// Returns `Ok(None)` when the user declined or the provider refused the
    /// exchange.
    async fn authorized_response(
        &self,
        params: &AuthorizedParams,
        request_token: Option<&RequestToken>,
    ) -> Result<Option<AuthorizedResponse>, AppError>;
}

/// Production OAuth client talking to flickr.com.
#[derive(Clone)]
pub struct FlickrOAuthClient {
    http: reqwest::Client,
    signer: OAuth1Signer,
    public_url: String,
}

impl FlickrOAuthClient {
    /// `public_url` is prepended to callback paths.
    pub fn new(http: reqwest::Client, signer: OAuth1Signer, public_url: String) -> Self {
        Self {
            http,
            signer,
            public_url,
        }
    }

    fn absolute_callback(&self, callback: &str) -> String {
        if callback.starts_with('/') {
            format!("{}{}", self.public_url.trim_end_matches('/'), callback)
        } else {
            callback.to_string()
        }
    }

    /// Signed GET against one of the handshake endpoints; decodes the form body.
    async fn signed_get<T: DeserializeOwned + Send>(
        &self,
        endpoint: &str,
        token: Option<TokenCredentials<'_>>,
        extra_oauth: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = Url::parse(endpoint)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid endpoint URL: {}", e)))?;
        let auth_header = self
            .signer
            .authorization_header("GET", &url, token, extra_oauth)?;

        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, auth_header)
            .send()
            .await
            .map_err(|e| AppError::FlickrApi(format!("Request to {} failed: {}", endpoint, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::FlickrApi(format!("HTTP {}: {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::FlickrApi(format!("Failed to read response: {}", e)))?;

        parse_token_response(&body)
    }
}

#[async_trait]
impl FlickrOAuth for FlickrOAuthClient {
    async fn authorize(&self, callback: &str) -> Result<Authorization, AppError> {
        let callback_url = self.absolute_callback(callback);
        let request_token: RequestToken = self
            .signed_get(REQUEST_TOKEN_URL, None, &[("oauth_callback", callback_url.as_str())])
            .await?;

        tracing::debug!(callback = %callback_url, "Obtained Flickr request token");

        Ok(Authorization {
            redirect_url: authorize_url(&request_token),
            request_token,
        })
    }

    async fn authorized_response(
        &self,
        params: &AuthorizedParams,
        request_token: Option<&RequestToken>,
    ) -> Result<Option<AuthorizedResponse>, AppError> {
        if params.denied.is_some() {
            tracing::info!("User declined Flickr authorization");
            return Ok(None);
        }

        let Some(verifier) = params.oauth_verifier.as_deref() else {
            return Ok(None);
        };

        let Some(request_token) = request_token else {
            tracing::warn!("Flickr callback without a pending request token");
            return Ok(None);
        };

        if let Some(token) = params.oauth_token.as_deref() {
            if token != request_token.oauth_token {
                tracing::warn!("Flickr callback token does not match pending request token");
                return Ok(None);
            }
        }

        let credentials = TokenCredentials {
            token: &request_token.oauth_token,
            secret: &request_token.oauth_token_secret,
        };

        match self
            .signed_get::<AuthorizedResponse>(
                ACCESS_TOKEN_URL,
                Some(credentials),
                &[("oauth_verifier", verifier)],
            )
            .await
        {
            Ok(response) => Ok(Some(response)),
            Err(AppError::FlickrApi(msg)) => {
                tracing::error!(error = %msg, "Flickr access token exchange failed");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Provider page for a request token.
pub fn authorize_url(request_token: &RequestToken) -> String {
    format!(
        "{}?oauth_token={}&perms=read",
        AUTHORIZE_URL,
        urlencoding::encode(&request_token.oauth_token)
    )
}

/// Decode an `application/x-www-form-urlencoded` token response.
///
/// A missing field means Flickr did not issue the token.
pub fn parse_token_response<T: DeserializeOwned>(body: &str) -> Result<T, AppError> {
    serde_urlencoded::from_str(body.trim())
        .map_err(|e| AppError::FlickrApi(format!("Unexpected token response: {}", e)))
}
