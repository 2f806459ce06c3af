// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth 1.0a request signing (HMAC-SHA1), as required by Flickr.

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Url;
use ring::rand::{SecureRandom, SystemRandom};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token half of the signing key: either a request token or an access token.
#[derive(Debug, Clone, Copy)]
pub struct TokenCredentials<'a> {
    pub token: &'a str,
    pub secret: &'a str,
}

/// Signs requests on behalf of the application (consumer).
#[derive(Clone)]
pub struct OAuth1Signer {
    consumer_key: String,
    consumer_secret: String,
    rng: SystemRandom,
}

impl OAuth1Signer {
    pub fn new(consumer_key: String, consumer_secret: String) -> Self {
        Self {
            consumer_key,
            consumer_secret,
            rng: SystemRandom::new(),
        }
    }

    /// Build the `Authorization: OAuth ...` header value for a request.
    ///
    /// `extra_oauth` carries protocol parameters specific to one step of the
    /// handshake (`oauth_callback`, `oauth_verifier`).
    pub fn authorization_header(
        &self,
        method: &str,
        url: &Url,
        token: Option<TokenCredentials<'_>>,
        extra_oauth: &[(&str, &str)],
    ) -> Result<String, AppError> {
        let nonce = self.nonce()?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
            .as_secs()
            .to_string();

        let mut oauth_params = self.oauth_params(token, extra_oauth, &nonce, &timestamp);
        let base = signature_base_string(method, url, &oauth_params);
        let signature = sign(&base, &self.consumer_secret, token.map(|t| t.secret));
        oauth_params.push(("oauth_signature".to_string(), signature));
        oauth_params.sort();

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", header))
    }

    fn oauth_params(
        &self,
        token: Option<TokenCredentials<'_>>,
        extra_oauth: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> Vec<(String, String)> {
        let mut params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];
        if let Some(token) = token {
            params.push(("oauth_token".to_string(), token.token.to_string()));
        }
        params.extend(
            extra_oauth
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        params
    }

    fn nonce(&self) -> Result<String, AppError> {
        let mut bytes = [0u8; 16];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to generate OAuth nonce")))?;
        Ok(hex::encode(bytes))
    }
}

/// RFC 3986 percent-encoding (unreserved characters pass through).
pub fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Build the signature base string from the request method, URL (whose query
/// parameters are included) and protocol parameters.
pub fn signature_base_string(method: &str, url: &Url, oauth_params: &[(String, String)]) -> String {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (percent_encode(&k), percent_encode(&v)))
        .chain(
            oauth_params
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .collect();
    params.sort();

    let normalized = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url.as_str()),
        percent_encode(&normalized)
    )
}

/// HMAC-SHA1 over the base string, base64 encoded.
pub fn sign(base_string: &str, consumer_secret: &str, token_secret: Option<&str>) -> String {
    let signing_key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        token_secret.map(percent_encode).unwrap_or_default()
    );

    let key = ring::hmac::Key::new(
        ring::hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
        signing_key.as_bytes(),
    );
    let tag = ring::hmac::sign(&key, base_string.as_bytes());
    BASE64.encode(tag.as_ref())
}
