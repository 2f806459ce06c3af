// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-browser session store.
//!
//! Session data lives in memory, keyed by an opaque id carried in the
//! `flickr_session` cookie. Handlers load a session at the start of a request
//! and save it before returning, so the cookie and the stored values change
//! together. Sessions unused for longer than the configured TTL are evicted,
//! and sessions left empty are removed on save.

use crate::error::AppError;
use crate::models::{FlickrToken, FlickrUser};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const SESSION_COOKIE: &str = "flickr_session";

pub const FLICKR_TOKEN_KEY: &str = "flickr_token";
pub const FLICKR_USER_KEY: &str = "flickr_user";
/// Pending request token between login and callback.
pub const REQUEST_TOKEN_KEY: &str = "flickr_oauthtok";
/// `next` given to the login view, used when the callback has none.
pub const NEXT_KEY: &str = "flickr_next";

/// Key-value data of one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    values: HashMap<String, Value>,
}

impl Session {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Decode a stored value. A value of the wrong shape reads as absent.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring undecodable session value");
                None
            }
        }
    }

    pub fn insert<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Session encode failed: {}", e)))?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Remove and decode a value.
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.get_as(key);
        self.values.remove(key);
        value
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Token of the logged-in Flickr user, if any.
pub fn get_flickr_token(session: &Session) -> Option<FlickrToken> {
    session.get_as(FLICKR_TOKEN_KEY)
}

pub fn get_flickr_user(session: &Session) -> Option<FlickrUser> {
    session.get_as(FLICKR_USER_KEY)
}

pub fn set_flickr_credentials(
    session: &mut Session,
    token: &FlickrToken,
    user: &FlickrUser,
) -> Result<(), AppError> {
    session.insert(FLICKR_TOKEN_KEY, token)?;
    session.insert(FLICKR_USER_KEY, user)
}

/// Forget the Flickr login. Absent keys are fine.
pub fn clear_flickr_credentials(session: &mut Session) {
    session.remove(FLICKR_TOKEN_KEY);
    session.remove(FLICKR_USER_KEY);
}

/// A session loaded for the duration of one request.
#[derive(Debug)]
pub struct LoadedSession {
    pub id: String,
    pub data: Session,
    is_new: bool,
}

struct StoredSession {
    data: Session,
    last_seen: Instant,
}

/// In-memory session storage shared by all requests.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, StoredSession>>,
    secure_cookies: bool,
    ttl: Duration,
    rng: SystemRandom,
}

impl SessionStore {
    /// Sessions not seen for `ttl` are dropped.
    pub fn new(secure_cookies: bool, ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            secure_cookies,
            ttl,
            rng: SystemRandom::new(),
        }
    }

    /// Load the session named by the request cookie, or start a new one.
    pub fn load(&self, jar: &CookieJar) -> Result<LoadedSession, AppError> {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            let id = cookie.value();
            if let Some(mut stored) = self.sessions.get_mut(id) {
                if stored.last_seen.elapsed() < self.ttl {
                    stored.last_seen = Instant::now();
                    return Ok(LoadedSession {
                        id: id.to_string(),
                        data: stored.data.clone(),
                        is_new: false,
                    });
                }
            }
            if self
                .sessions
                .remove_if(id, |_, stored| stored.last_seen.elapsed() >= self.ttl)
                .is_some()
            {
                tracing::debug!("Session expired, starting a new session");
            } else {
                tracing::debug!("Unknown session id, starting a new session");
            }
        }

        Ok(LoadedSession {
            id: self.new_id()?,
            data: Session::default(),
            is_new: true,
        })
    }

    /// Persist the session and attach the cookie for new sessions.
    ///
    /// An empty session is not kept: a new one never gets a cookie, an
    /// existing one is removed along with its cookie.
    pub fn save(&self, jar: CookieJar, session: LoadedSession) -> CookieJar {
        if session.data.is_empty() {
            if session.is_new {
                return jar;
            }
            self.sessions.remove(&session.id);
            return jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
        }

        let is_new = session.is_new;
        let id = session.id;
        self.sessions.insert(
            id.clone(),
            StoredSession {
                data: session.data,
                last_seen: Instant::now(),
            },
        );

        if is_new {
            jar.add(self.cookie(id))
        } else {
            jar
        }
    }

    /// Drop every session not seen within the TTL. Returns how many went.
    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, stored| stored.last_seen.elapsed() < self.ttl);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions.get(id).map(|s| s.data.clone())
    }

    pub fn insert(&self, id: &str, session: Session) {
        self.sessions.insert(
            id.to_string(),
            StoredSession {
                data: session,
                last_seen: Instant::now(),
            },
        );
    }

    fn cookie(&self, id: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .build()
    }

    fn new_id(&self) -> Result<String, AppError> {
        let mut bytes = [0u8; 32];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to generate session id")))?;
        Ok(hex::encode(bytes))
    }
}
