// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated HTTP transport for the Flickr REST API.
//!
//! Responses are classified once, here, into [`ApiResponse`] so callers never
//! inspect raw bodies to decide what happened.

use crate::models::FlickrToken;
use crate::services::signing::{OAuth1Signer, TokenCredentials};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

/// Provider-level outcome carried in the `stat` field of every REST payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Ok,
    Fail,
}

/// Result of one REST call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Non-success HTTP status, or the request never completed.
    TransportError { status: u16, body: String },
    /// Successful HTTP exchange; `raw` is the decoded JSON payload.
    Provider { status: u16, stat: Stat, raw: Value },
}

impl ApiResponse {
    /// Status reported for requests that failed before a response arrived.
    pub const UNREACHABLE_STATUS: u16 = 502;

    /// Classify a raw HTTP response.
    pub fn from_parts(status: u16, body: &str) -> Self {
        if !(200..300).contains(&status) {
            return ApiResponse::TransportError {
                status,
                body: body.to_string(),
            };
        }

        let raw = serde_json::from_str::<Value>(body)
            .unwrap_or_else(|_| Value::String(body.to_string()));
        let stat = match raw.get("stat").and_then(Value::as_str) {
            Some("ok") => Stat::Ok,
            _ => Stat::Fail,
        };

        ApiResponse::Provider { status, stat, raw }
    }
}

/// An HTTP client able to issue requests authenticated as a Flickr user.
#[async_trait]
pub trait FlickrTransport: Send + Sync {
    async fn get(&self, url: &str, token: &FlickrToken) -> ApiResponse;
}

/// Production transport: reqwest with OAuth 1.0a signed requests.
#[derive(Clone)]
pub struct OAuthTransport {
    http: reqwest::Client,
    signer: OAuth1Signer,
}

impl OAuthTransport {
    pub fn new(http: reqwest::Client, signer: OAuth1Signer) -> Self {
        Self { http, signer }
    }
}

#[async_trait]
impl FlickrTransport for OAuthTransport {
    async fn get(&self, url: &str, token: &FlickrToken) -> ApiResponse {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                return ApiResponse::TransportError {
                    status: 400,
                    body: format!("Invalid URL {}: {}", url, e),
                }
            }
        };

        let credentials = TokenCredentials {
            token: &token.oauth_token,
            secret: &token.oauth_token_secret,
        };
        let auth_header = match self
            .signer
            .authorization_header("GET", &parsed, Some(credentials), &[])
        {
            Ok(h) => h,
            Err(e) => {
                return ApiResponse::TransportError {
                    status: 500,
                    body: e.to_string(),
                }
            }
        };

        let response = match self
            .http
            .get(parsed)
            .header(reqwest::header::AUTHORIZATION, auth_header)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Flickr request failed");
                return ApiResponse::TransportError {
                    status: ApiResponse::UNREACHABLE_STATUS,
                    body: e.to_string(),
                };
            }
        };

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ApiResponse::from_parts(status, &body)
    }
}
