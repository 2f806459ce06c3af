// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod album;
pub mod token;

pub use album::AlbumInfo;
pub use token::{AuthorizedResponse, FlickrToken, FlickrUser, RequestToken};
