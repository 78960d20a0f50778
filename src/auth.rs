//! OAuth authorization-code flow with PKCE.
//!
//! The flow is interactive: the user opens [`authorize_url`] in a browser,
//! approves access, and pastes the redirect URL back. The code it carries is
//! exchanged for a [`TokenRecord`].

use crate::{token::TokenRecord, Error, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use log::info;
use rand::RngCore;
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use url::Url;

/// Maximum verifier length allowed by RFC 7636
const MAX_VERIFIER_LEN: usize = 128;

/// Random bytes drawn for the verifier before encoding
const VERIFIER_BYTES: usize = 96;

/// Code verifier and its S256 challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    /// Generate a fresh verifier from the OS random source
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; VERIFIER_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let mut verifier = URL_SAFE_NO_PAD.encode(bytes);
        verifier.truncate(MAX_VERIFIER_LEN);
        Self::from_verifier(verifier)
    }

    /// Derive the challenge for a known verifier
    #[must_use]
    pub fn from_verifier(verifier: String) -> Self {
        let challenge = challenge_for(&verifier);
        Self { verifier, challenge }
    }
}

/// `BASE64URL(SHA256(verifier))` without padding
#[must_use]
pub fn challenge_for(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

fn endpoint(base: &str, path: &str) -> Result<Url> {
    Url::parse(base)
        .and_then(|u| u.join(path))
        .map_err(|e| Error::Auth(format!("Invalid accounts URL {base}: {e}")))
}

/// Build the authorization page URL
///
/// # Errors
///
/// Returns [`Error::Auth`] if `accounts_base` is not a valid URL or required
/// parameters are empty.
pub fn authorize_url(
    accounts_base: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    challenge: &str,
) -> Result<Url> {
    if client_id.is_empty() {
        return Err(Error::Auth("Client id is not set".to_string()));
    }
    if redirect_uri.is_empty() {
        return Err(Error::Auth("Redirect URI is not set".to_string()));
    }
    let mut url = endpoint(accounts_base, "/authorize")?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", scope)
        .append_pair("code_challenge_method", "S256")
        .append_pair("code_challenge", challenge);
    Ok(url)
}

/// Pull the authorization code out of a pasted redirect URL
///
/// # Errors
///
/// Returns [`Error::Auth`] if the URL is malformed, carries an `error`
/// parameter, or has no `code`.
pub fn extract_code(redirect: &str) -> Result<String> {
    let url = Url::parse(redirect.trim()).map_err(|e| Error::Auth(format!("Invalid redirect URL: {e}")))?;
    let mut code = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "error" => return Err(Error::Auth(format!("Authorization denied: {value}"))),
            "code" if !value.is_empty() => code = Some(value.into_owned()),
            _ => {}
        }
    }
    code.ok_or_else(|| Error::Auth("Failed to extract code from URL".to_string()))
}

/// Exchange an authorization code for tokens
///
/// # Errors
///
/// Returns [`Error::Auth`] with the response body on a non-success status,
/// or a transport/JSON error.
pub fn exchange_code(
    accounts_base: &str,
    client_id: &str,
    redirect_uri: &str,
    code: &str,
    verifier: &str,
) -> Result<TokenRecord> {
    let token_url = endpoint(accounts_base, "/api/token")?;
    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri),
        ("client_id", client_id),
        ("code_verifier", verifier),
    ];

    info!("Requesting tokens from {token_url}");
    let response = Client::new().post(token_url).form(&form).send()?;
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(Error::Auth(format!("Token request failed ({status}): {body}")));
    }

    Ok(TokenRecord::from_json(&body)?.stamped_now())
}
