// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flickr login API server.

use flickr_login::{
    config::Config,
    services::{FlickrOAuthClient, OAuth1Signer, OAuthTransport},
    session::SessionStore,
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        public_url = %config.public_url,
        "Starting Flickr login service"
    );

    let http = reqwest::Client::new();
    let signer = OAuth1Signer::new(
        config.flickr_api_key.clone(),
        config.flickr_shared_secret.clone(),
    );

    let oauth = FlickrOAuthClient::new(http.clone(), signer.clone(), config.public_url.clone());
    let flickr_transport = OAuthTransport::new(http, signer);

    if config.allowed_redirect_hosts.is_empty() {
        tracing::warn!("ALLOWED_REDIRECT_HOSTS not set, `next` redirects are not restricted");
    }

    let state = Arc::new(AppState {
        sessions: SessionStore::new(config.secure_cookies(), config.session_ttl),
        oauth: Arc::new(oauth),
        flickr_transport: Arc::new(flickr_transport),
        config: config.clone(),
    });

    spawn_session_sweeper(state.sessions.clone());

    let app = flickr_login::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically evict expired sessions.
fn spawn_session_sweeper(sessions: SessionStore) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, remaining = sessions.len(), "Evicted expired sessions");
            }
        }
    });
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("flickr_login=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
