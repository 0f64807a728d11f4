//! OAuth callback token bundle parsing.
//!
//! The identity provider redirects to `/auth/callback#token=<bundle>`, where
//! the bundle is base64 JSON `{"token": ..., "userId": ...}`. The bundle
//! rides in the fragment so it never reaches server logs.

#[cfg(test)]
#[path = "oauth_test.rs"]
mod oauth_test;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};

use crate::net::types::TokenBundle;

/// How long a callback error stays on screen before returning to the entry
/// route.
pub const OAUTH_ERROR_REDIRECT_MS: u32 = 3000;

/// Where a completed OAuth sign-in lands.
pub const OAUTH_SUCCESS_ROUTE: &str = "/projects";

const TOKEN_PARAM: &str = "token";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OAuthCallbackError {
    #[error("callback is missing the token bundle")]
    MissingToken,
    #[error("token bundle is not valid base64: {0}")]
    Encoding(String),
    #[error("token bundle is not valid JSON: {0}")]
    Payload(String),
    #[error("token bundle has an empty `{0}`")]
    EmptyField(&'static str),
}

impl OAuthCallbackError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingToken => "Sign-in link is incomplete. Returning to login...",
            Self::Encoding(_) | Self::Payload(_) | Self::EmptyField(_) => {
                "Sign-in response could not be read. Returning to login..."
            }
        }
    }
}

/// Parse the token bundle out of a callback URL fragment (with or without
/// the leading `#`).
///
/// # Errors
///
/// Returns an [`OAuthCallbackError`] when the `token` parameter is missing,
/// is not base64, does not decode to a bundle, or carries empty fields.
pub fn parse_callback_fragment(fragment: &str) -> Result<TokenBundle, OAuthCallbackError> {
    let raw = fragment
        .trim_start_matches('#')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find_map(|(key, value)| (key == TOKEN_PARAM).then_some(value))
        .filter(|value| !value.is_empty())
        .ok_or(OAuthCallbackError::MissingToken)?;

    let encoded = urlencoding::decode(raw).map_err(|e| OAuthCallbackError::Encoding(e.to_string()))?;
    decode_bundle(&encoded)
}

/// Decode a base64 bundle. Standard and URL-safe alphabets are both
/// accepted, padded or not.
///
/// # Errors
///
/// See [`parse_callback_fragment`].
pub fn decode_bundle(encoded: &str) -> Result<TokenBundle, OAuthCallbackError> {
    let trimmed = encoded.trim().trim_end_matches('=');
    let engine = if trimmed.contains(['-', '_']) { &URL_SAFE_NO_PAD } else { &STANDARD_NO_PAD };
    let bytes = engine
        .decode(trimmed)
        .map_err(|e| OAuthCallbackError::Encoding(e.to_string()))?;

    let bundle: TokenBundle =
        serde_json::from_slice(&bytes).map_err(|e| OAuthCallbackError::Payload(e.to_string()))?;
    if bundle.token.trim().is_empty() {
        return Err(OAuthCallbackError::EmptyField("token"));
    }
    if bundle.user_id.trim().is_empty() {
        return Err(OAuthCallbackError::EmptyField("userId"));
    }
    Ok(bundle)
}
