// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flickr login for a crowdsourcing web application.
//!
//! Provides the OAuth 1.0a "login with Flickr" views, keeps the resulting
//! credentials in the browser session, and lists the user's photo albums.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use config::Config;
use services::{FlickrOAuth, FlickrTransport};
use session::SessionStore;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub oauth: Arc<dyn FlickrOAuth>,
    pub flickr_transport: Arc<dyn FlickrTransport>,
}
