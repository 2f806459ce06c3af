// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Photo album (photoset) models.

use serde::{Deserialize, Deserializer, Serialize};

/// Album summary returned to the web layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumInfo {
    pub id: String,
    pub title: String,
    /// Photo count, as reported by Flickr
    pub photos: String,
    pub thumbnail_url: String,
}

/// One entry of `photosets.photoset` in a `flickr.photosets.getList` response.
///
/// Only the fields needed for [`AlbumInfo`] are modeled; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotosetRecord {
    pub id: String,
    pub title: Content,
    #[serde(deserialize_with = "string_or_number")]
    pub photos: String,
    pub primary_photo_extras: PrimaryPhotoExtras,
}

/// Flickr's `{"_content": "..."}` text wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    #[serde(rename = "_content")]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrimaryPhotoExtras {
    pub url_t: String,
}

impl From<PhotosetRecord> for AlbumInfo {
    fn from(record: PhotosetRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.content,
            photos: record.photos,
            thumbnail_url: record.primary_photo_extras.url_t,
        }
    }
}

/// Flickr is inconsistent about quoting counts.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}
