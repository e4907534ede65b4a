//! OAuth 2.0 authorization for the YouTube Data API
//!
//! Installed-app flow with a loopback redirect: the operator opens the
//! consent URL, approves, and pastes back either the code or the whole
//! redirected URL. The code is then exchanged for an access token.

use reqwest::Url;
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

/// Scope required to manage live broadcasts
pub const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube.force-ssl";

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Authorization failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("enter an OAuth 2.0 client id first")]
    MissingClientId,

    #[error("no authorization code was provided")]
    MissingCode,

    #[error("the pasted address belongs to a different sign-in attempt")]
    StateMismatch,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authorization server returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Bearer token for API calls
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: Option<Instant>,
}

impl AccessToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|t| Instant::now() >= t).unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// OAuth client configured by the operator
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: String,
    token_url: String,
}

impl OAuthClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: Option<String>,
        redirect_port: u16,
    ) -> Result<Self, AuthError> {
        let client_id = client_id.into().trim().to_string();
        if client_id.is_empty() {
            return Err(AuthError::MissingClientId);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret: client_secret.filter(|s| !s.trim().is_empty()),
            redirect_uri: format!("http://127.0.0.1:{}", redirect_port),
            token_url: TOKEN_URL.to_string(),
        })
    }

    /// Consent page URL the operator opens in a browser
    pub fn authorization_url(&self, state: &str) -> String {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", YOUTUBE_SCOPE),
            ("access_type", "online"),
            ("state", state),
        ];
        Url::parse_with_params(AUTH_URL, &params)
            .map(String::from)
            .unwrap_or_else(|_| AUTH_URL.to_string())
    }

    /// Trade an authorization code (or the redirected URL containing it)
    /// for an access token. A redirected URL must carry `expected_state`.
    pub async fn exchange_code(&self, input: &str, expected_state: Option<&str>) -> Result<AccessToken, AuthError> {
        let code = extract_code(input, expected_state)?;

        let mut form = vec![
            ("code", code.as_str()),
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.as_str()));
        }

        let response = self.http.post(&self.token_url).form(&form).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<TokenErrorResponse>(&bytes)
                .map(|e| e.error_description.unwrap_or(e.error))
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).trim().to_string());
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = serde_json::from_slice(&bytes).map_err(|e| AuthError::Api {
            status: status.as_u16(),
            message: format!("malformed token response: {}", e),
        })?;

        info!("YouTube authorization complete");
        Ok(AccessToken {
            token: token.access_token,
            expires_at: token
                .expires_in
                .and_then(|secs| Instant::now().checked_add(Duration::from_secs(secs))),
        })
    }
}

/// Pull the authorization code out of operator input: either the bare code
/// or the full redirect URL with `code` and `state` query parameters.
///
/// A redirect URL whose `state` differs from `expected_state` is rejected.
pub fn extract_code(input: &str, expected_state: Option<&str>) -> Result<String, AuthError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AuthError::MissingCode);
    }
    let Ok(url) = Url::parse(input) else {
        return Ok(input.to_string());
    };

    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    };
    if let Some(expected) = expected_state {
        if param("state").as_deref() != Some(expected) {
            warn!("Redirect state does not match the sign-in attempt");
            return Err(AuthError::StateMismatch);
        }
    }
    param("code").filter(|c| !c.is_empty()).ok_or(AuthError::MissingCode)
}
