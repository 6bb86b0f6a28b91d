use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Credentials, HELIX_BASE_URL, TransportError};

/// Which token a request is authenticated with.
#[derive(Clone, Copy)]
enum TokenKind {
    User,
    App,
}

/// HTTP client for the Helix API with automatic auth header injection.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its pool.
#[derive(Clone)]
pub struct TwitchHttpClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl TwitchHttpClient {
    /// Create a client against the standard Helix base URL.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: HELIX_BASE_URL.to_string(),
            credentials,
        }
    }

    /// Create a client against a custom base URL (tests, proxies).
    pub fn with_base_url(credentials: Credentials, base_url: &str) -> Result<Self, TransportError> {
        Url::parse(base_url)?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }

    fn token_for(&self, kind: TokenKind) -> Result<&str, TransportError> {
        match kind {
            TokenKind::User => Ok(&self.credentials.user_token),
            TokenKind::App => self
                .credentials
                .app_token
                .as_deref()
                .ok_or(TransportError::MissingAppToken),
        }
    }

    fn builder(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        kind: TokenKind,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        let token = self.token_for(kind)?;
        let url = format!("{}{path}", self.base_url);
        let mut rb = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .header("Client-Id", &self.credentials.client_id);
        if !query.is_empty() {
            rb = rb.query(query);
        }
        Ok(rb)
    }

    async fn dispatch(&self, rb: reqwest::RequestBuilder) -> Result<String, TransportError> {
        let resp = rb.send().await?;
        let status = resp.status();
        let url = resp.url().clone();
        let body = resp.text().await?;

        if status.is_success() {
            return Ok(body);
        }
        tracing::warn!(status = status.as_u16(), url = %url, "Helix request failed");
        Err(classify(status.as_u16(), &body))
    }

    /// Execute a GET request with the user token.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, TransportError> {
        let rb = self.builder(Method::GET, path, query, TokenKind::User)?;
        self.dispatch(rb).await
    }

    /// Execute a POST request with a JSON body.
    pub async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &impl Serialize,
    ) -> Result<String, TransportError> {
        let rb = self.builder(Method::POST, path, query, TokenKind::User)?.json(body);
        self.dispatch(rb).await
    }

    /// Execute a POST request with no body (query-only endpoints).
    pub async fn post_empty(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, TransportError> {
        let rb = self.builder(Method::POST, path, query, TokenKind::User)?;
        self.dispatch(rb).await
    }

    /// Execute a PATCH request with a JSON body.
    pub async fn patch(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &impl Serialize,
    ) -> Result<String, TransportError> {
        let rb = self.builder(Method::PATCH, path, query, TokenKind::User)?.json(body);
        self.dispatch(rb).await
    }

    /// Execute a PATCH request with no body.
    pub async fn patch_empty(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, TransportError> {
        let rb = self.builder(Method::PATCH, path, query, TokenKind::User)?;
        self.dispatch(rb).await
    }

    /// Execute a PUT request with a JSON body.
    pub async fn put(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &impl Serialize,
    ) -> Result<String, TransportError> {
        let rb = self.builder(Method::PUT, path, query, TokenKind::User)?.json(body);
        self.dispatch(rb).await
    }

    /// Execute a PUT request with no body.
    pub async fn put_empty(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, TransportError> {
        let rb = self.builder(Method::PUT, path, query, TokenKind::User)?;
        self.dispatch(rb).await
    }

    /// Execute a DELETE request.
    pub async fn delete(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(), TransportError> {
        let rb = self.builder(Method::DELETE, path, query, TokenKind::User)?;
        self.dispatch(rb).await?;
        Ok(())
    }

    /// Execute a DELETE request and return the response body, for the
    /// few endpoints whose DELETE responses carry data.
    pub async fn delete_returning(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, TransportError> {
        let rb = self.builder(Method::DELETE, path, query, TokenKind::User)?;
        self.dispatch(rb).await
    }

    /// Execute a GET request with the app token.
    pub async fn get_app(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, TransportError> {
        let rb = self.builder(Method::GET, path, query, TokenKind::App)?;
        self.dispatch(rb).await
    }

    /// Execute a POST request with the app token and a JSON body.
    pub async fn post_app(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &impl Serialize,
    ) -> Result<String, TransportError> {
        let rb = self.builder(Method::POST, path, query, TokenKind::App)?.json(body);
        self.dispatch(rb).await
    }

    /// Execute a PATCH request with the app token and a JSON body.
    pub async fn patch_app(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &impl Serialize,
    ) -> Result<String, TransportError> {
        let rb = self.builder(Method::PATCH, path, query, TokenKind::App)?.json(body);
        self.dispatch(rb).await
    }

    /// Execute a DELETE request with the app token.
    pub async fn delete_app(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(), TransportError> {
        let rb = self.builder(Method::DELETE, path, query, TokenKind::App)?;
        self.dispatch(rb).await?;
        Ok(())
    }
}

/// Helix error bodies look like `{"error": "...", "status": ..., "message": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string())
}

fn classify(status: u16, body: &str) -> TransportError {
    let message = error_message(body);
    match status {
        401 => TransportError::Auth { message },
        403 => TransportError::Forbidden { message },
        400 | 422 => TransportError::Validation { status, message },
        429 => TransportError::RateLimited { message },
        _ => TransportError::Api { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_maps_statuses_to_taxonomy() {
        assert!(matches!(classify(401, "{}"), TransportError::Auth { .. }));
        assert!(matches!(classify(403, "{}"), TransportError::Forbidden { .. }));
        assert!(matches!(
            classify(400, "{}"),
            TransportError::Validation { status: 400, .. }
        ));
        assert!(matches!(classify(422, "{}"), TransportError::Validation { .. }));
        assert!(matches!(classify(429, "{}"), TransportError::RateLimited { .. }));
        assert!(matches!(
            classify(500, "{}"),
            TransportError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn error_message_prefers_helix_message_field() {
        let body = r#"{"error": "Unauthorized", "status": 401, "message": "Invalid OAuth token"}"#;
        assert_eq!(error_message(body), "Invalid OAuth token");
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("not json"), "not json");
        assert_eq!(error_message(r#"{"status": 500}"#), r#"{"status": 500}"#);
    }

    #[test]
    fn app_verbs_require_app_token() {
        let client = TwitchHttpClient::new(Credentials::new("cid", "user-token"));
        assert!(matches!(
            client.token_for(TokenKind::App),
            Err(TransportError::MissingAppToken)
        ));
        assert_eq!(client.token_for(TokenKind::User).unwrap(), "user-token");
    }

    #[test]
    fn with_base_url_rejects_invalid_urls() {
        let creds = Credentials::new("cid", "token");
        assert!(TwitchHttpClient::with_base_url(creds.clone(), "not a url").is_err());
        let client = TwitchHttpClient::with_base_url(creds, "http://127.0.0.1:9999/helix/").unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:9999/helix");
    }
}
