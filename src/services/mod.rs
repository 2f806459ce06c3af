// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - Flickr OAuth and REST plumbing.

pub mod flickr;
pub mod oauth;
pub mod signing;
pub mod transport;

pub use flickr::FlickrClient;
pub use oauth::{FlickrOAuth, FlickrOAuthClient};
pub use signing::OAuth1Signer;
pub use transport::{ApiResponse, FlickrTransport, OAuthTransport, Stat};
