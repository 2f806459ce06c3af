// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth credential models kept in the session.

use serde::{Deserialize, Serialize};

/// Flickr access token, stored in the session under `flickr_token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlickrToken {
    pub oauth_token: String,
    pub oauth_token_secret: String,
}

/// Flickr user identity, stored in the session under `flickr_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlickrUser {
    pub username: String,
    pub user_nsid: String,
}

/// Temporary request token issued during the authorize step.
///
/// Kept in the session until the callback exchanges it for an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestToken {
    pub oauth_token: String,
    pub oauth_token_secret: String,
}

/// Fields returned by Flickr's access token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthorizedResponse {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    pub username: String,
    pub user_nsid: String,
    /// Display name. Never stored.
    #[serde(default)]
    pub fullname: Option<String>,
}

impl AuthorizedResponse {
    /// Split into the token and user records that go into the session.
    pub fn into_session_parts(self) -> (FlickrToken, FlickrUser) {
        (
            FlickrToken {
                oauth_token: self.oauth_token,
                oauth_token_secret: self.oauth_token_secret,
            },
            FlickrUser {
                username: self.username,
                user_nsid: self.user_nsid,
            },
        )
    }
}
