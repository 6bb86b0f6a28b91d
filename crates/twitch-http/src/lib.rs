//! Authenticated HTTP transport for the Twitch Helix API.
//!
//! Provides verb helpers (GET/POST/PATCH/PUT/DELETE) with automatic
//! Bearer token + Client-ID header injection, app-token variants for
//! endpoints that require application credentials, and a typed error
//! taxonomy for non-2xx responses. No retry or backoff policy lives
//! here; callers decide.

mod client;

pub use client::TwitchHttpClient;

use std::env;

/// Default Helix API base URL.
pub const HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

/// Tokens and client id supplied by the caller.
///
/// Token acquisition and refresh are out of scope; whoever owns the
/// OAuth flow hands finished tokens in here.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    /// User access token, sent with the plain verb helpers.
    pub user_token: String,
    /// App access token, required only by the `_app` verb helpers.
    pub app_token: Option<String>,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, user_token: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            user_token: user_token.into(),
            app_token: None,
        }
    }

    pub fn with_app_token(mut self, app_token: impl Into<String>) -> Self {
        self.app_token = Some(app_token.into());
        self
    }

    /// Load credentials from `TWITCH_CLIENT_ID`, `TWITCH_USER_TOKEN` and
    /// (optionally) `TWITCH_APP_TOKEN`.
    pub fn from_env() -> Result<Self, TransportError> {
        let client_id = env::var("TWITCH_CLIENT_ID")
            .map_err(|_| TransportError::Config("TWITCH_CLIENT_ID is not set".into()))?;
        let user_token = env::var("TWITCH_USER_TOKEN")
            .map_err(|_| TransportError::Config("TWITCH_USER_TOKEN is not set".into()))?;
        Ok(Self {
            client_id,
            user_token,
            app_token: env::var("TWITCH_APP_TOKEN").ok(),
        })
    }
}

/// Error type for the transport crate.
///
/// Non-2xx statuses are classified so callers can tell an expired token
/// from a missing scope, a rejected request body, or a rate limit.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication failed: {message}")]
    Auth { message: String },

    #[error("missing scope or forbidden: {message}")]
    Forbidden { message: String },

    #[error("request validation failed (status {status}): {message}")]
    Validation { status: u16, message: String },

    #[error("rate limited: {message}")]
    RateLimited { message: String },

    #[error("Twitch API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("app access token required but not configured")]
    MissingAppToken,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("missing configuration: {0}")]
    Config(String),
}
