// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flickr REST API client for the logged-in user.

use crate::models::album::PhotosetRecord;
use crate::models::{AlbumInfo, FlickrToken, FlickrUser};
use crate::services::transport::{ApiResponse, FlickrTransport, Stat};
use serde_json::Value;
use std::sync::Arc;

pub const REST_URL: &str = "https://api.flickr.com/services/rest/";

/// Flickr client bound to one user's access token.
#[derive(Clone)]
pub struct FlickrClient {
    transport: Arc<dyn FlickrTransport>,
    token: FlickrToken,
    user: FlickrUser,
}

impl FlickrClient {
    pub fn new(transport: Arc<dyn FlickrTransport>, token: FlickrToken, user: FlickrUser) -> Self {
        Self {
            transport,
            token,
            user,
        }
    }

    /// `flickr.photosets.getList` for the bound user, with thumbnail URLs.
    pub fn own_albums_url(&self) -> String {
        format!(
            "{}?method=flickr.photosets.getList&user_id={}\
             &primary_photo_extras=url_t&format=json&nojsoncallback=1",
            REST_URL,
            urlencoding::encode(&self.user.user_nsid)
        )
    }

    /// List the user's albums.
    ///
    /// Never fails: transport errors and provider-reported failures both
    /// yield an empty list. Only the latter is logged as an error.
    pub async fn get_own_albums(&self) -> Vec<AlbumInfo> {
        let url = self.own_albums_url();

        match self.transport.get(&url, &self.token).await {
            ApiResponse::TransportError { status, body } => {
                tracing::debug!(status, body = %body, "Flickr album request failed");
                Vec::new()
            }
            ApiResponse::Provider {
                status,
                stat: Stat::Fail,
                raw,
            } => {
                tracing::error!("{}", bad_response_message(status, &raw));
                Vec::new()
            }
            ApiResponse::Provider {
                status,
                stat: Stat::Ok,
                raw,
            } => match extract_albums(&raw) {
                Some(albums) => {
                    tracing::debug!(
                        user = %self.user.username,
                        count = albums.len(),
                        "Fetched Flickr albums"
                    );
                    albums
                }
                None => {
                    tracing::error!("{}", bad_response_message(status, &raw));
                    Vec::new()
                }
            },
        }
    }
}

/// Error log line for a provider-reported failure.
pub fn bad_response_message(status: u16, raw: &Value) -> String {
    format!("Bad response from Flickr:\nStatus: {}, Content: {}", status, raw)
}

/// Map `photosets.photoset` to album summaries, preserving order.
///
/// Returns `None` when the payload has no photoset list at all. Individual
/// records missing required fields are skipped.
pub fn extract_albums(raw: &Value) -> Option<Vec<AlbumInfo>> {
    let records = raw.get("photosets")?.get("photoset")?.as_array()?;

    let albums = records
        .iter()
        .filter_map(
            |record| match serde_json::from_value::<PhotosetRecord>(record.clone()) {
                Ok(r) => Some(AlbumInfo::from(r)),
                Err(e) => {
                    tracing::warn!(
                        id = record.get("id").and_then(|v| v.as_str()).unwrap_or("?"),
                        error = %e,
                        "Skipping malformed Flickr photoset"
                    );
                    None
                }
            },
        )
        .collect();

    Some(albums)
}
