// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Default session lifetime without activity: one day.
const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Flickr API key (OAuth consumer key)
    pub flickr_api_key: String,
    /// Flickr shared secret (OAuth consumer secret)
    pub flickr_shared_secret: String,
    /// Externally visible base URL, used to build the OAuth callback URL
    pub public_url: String,
    /// Server port
    pub port: u16,
    /// Hosts a `next` redirect may point at. Empty means any target is allowed.
    pub allowed_redirect_hosts: Vec<String>,
    /// Idle time after which a session is evicted
    pub session_ttl: Duration,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            flickr_api_key: "test_api_key".to_string(),
            flickr_shared_secret: "test_shared_secret".to_string(),
            public_url: "http://localhost:8080".to_string(),
            port: 8080,
            allowed_redirect_hosts: Vec::new(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            flickr_api_key: env::var("FLICKR_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FLICKR_API_KEY"))?,
            flickr_shared_secret: env::var("FLICKR_SHARED_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FLICKR_SHARED_SECRET"))?,
            public_url: env::var("PUBLIC_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            allowed_redirect_hosts: env::var("ALLOWED_REDIRECT_HOSTS")
                .map(|v| parse_host_list(&v))
                .unwrap_or_default(),
            session_ttl: Duration::from_secs(
                env::var("SESSION_TTL_SECS")
                    .ok()
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_SESSION_TTL_SECS),
            ),
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.public_url.starts_with("https://")
    }
}

fn parse_host_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().to_ascii_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
