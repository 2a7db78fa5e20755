//! Authenticated Microsoft Graph client
//!
//! Every call makes sure the session holds a bearer token (acquiring one
//! lazily), attaches it, and converts transport failures and non-2xx
//! statuses into [`SharePointError::Api`]. A 401 invalidates the session's
//! token and the request is sent once more with a fresh one; no other status
//! is retried.

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_auth::{AccessToken, ClientCredentialsConfig, TokenProvider};
use core_runtime::config::SharePointConfig;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::{Result, SharePointError};
use crate::session::GraphSession;
use crate::types::DriveItemPage;

/// Longest slice of a non-JSON error body kept in an error message
const MAX_ERROR_BODY: usize = 512;

/// Graph API client bound to one base URL and one app registration.
pub struct GraphClient {
    http_client: Arc<dyn HttpClient>,
    token_provider: TokenProvider,
    base_url: String,
}

impl GraphClient {
    /// Create a new Graph client
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `token_provider` - Source of bearer tokens
    /// * `base_url` - Graph root, e.g. `https://graph.microsoft.com/v1.0`
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        token_provider: TokenProvider,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http_client,
            token_provider,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a client (and its token provider) from the runtime configuration
    pub fn from_config(config: &SharePointConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let token_provider = TokenProvider::new(
            ClientCredentialsConfig::from(config),
            Arc::clone(&http_client),
        );
        Self::new(http_client, token_provider, config.graph_base_url.clone())
    }

    /// Graph root URL, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request a fresh token and store it in the session, replacing any
    /// cached one.
    #[instrument(skip(self, session))]
    pub async fn refresh_token(&self, session: &mut GraphSession) -> Result<AccessToken> {
        session.invalidate_token();
        let token = self.token_provider.acquire().await?;
        session.set_token(token.clone());
        Ok(token)
    }

    /// Return the session's token, acquiring one if none is cached.
    pub async fn ensure_token(&self, session: &mut GraphSession) -> Result<AccessToken> {
        if let Some(token) = session.token().cloned() {
            return Ok(token);
        }

        debug!("No cached access token, acquiring one");
        self.refresh_token(session).await
    }

    /// GET a JSON resource
    pub async fn get(&self, session: &mut GraphSession, url: &str) -> Result<Value> {
        let response = self
            .send(session, |token| HttpRequest::get(url).bearer_token(token).accept_json())
            .await?;
        Self::parse_json(&response)
    }

    /// GET one page of a driveItem collection
    pub async fn get_page(&self, session: &mut GraphSession, url: &str) -> Result<DriveItemPage> {
        let response = self
            .send(session, |token| HttpRequest::get(url).bearer_token(token).accept_json())
            .await?;
        Self::parse_json(&response)
    }

    /// GET raw bytes (file content)
    pub async fn get_bytes(&self, session: &mut GraphSession, url: &str) -> Result<Bytes> {
        let response = self
            .send(session, |token| HttpRequest::get(url).bearer_token(token))
            .await?;
        Ok(response.body)
    }

    /// PUT a raw body and parse the JSON reply
    pub async fn put(
        &self,
        session: &mut GraphSession,
        url: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<Value> {
        let response = self
            .send(session, |token| {
                HttpRequest::new(HttpMethod::Put, url)
                    .bearer_token(token)
                    .accept_json()
                    .content(body.clone(), content_type)
            })
            .await?;
        Self::parse_json(&response)
    }

    async fn send<F>(&self, session: &mut GraphSession, build: F) -> Result<HttpResponse>
    where
        F: Fn(&str) -> HttpRequest,
    {
        let token = self.ensure_token(session).await?;
        let response = self.dispatch(build(token.secret())).await?;

        if !response.is_unauthorized() {
            return Self::check_status(response);
        }

        warn!("Graph rejected the access token, acquiring a new one");
        let token = self.refresh_token(session).await?;
        let response = self.dispatch(build(token.secret())).await?;
        Self::check_status(response)
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();

        self.http_client.execute(request).await.map_err(|e| {
            warn!(?method, url = %url, error = %e, "Graph request failed");
            SharePointError::transport(e.to_string())
        })
    }

    fn check_status(response: HttpResponse) -> Result<HttpResponse> {
        if response.is_success() {
            debug!(status = response.status, "Graph request succeeded");
            return Ok(response);
        }

        let message = error_message(&response);
        warn!(status = response.status, error = %message, "Graph returned an error status");

        Err(SharePointError::Api {
            status: Some(response.status),
            message,
        })
    }

    fn parse_json<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T> {
        serde_json::from_slice(&response.body).map_err(|e| SharePointError::Parse(e.to_string()))
    }
}

#[derive(Deserialize)]
struct GraphErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Deserialize)]
struct GraphErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Human-readable message for a failed response.
///
/// Graph's `{"error": {"code", "message"}}` envelope is unwrapped; other
/// bodies are included as text, truncated.
fn error_message(response: &HttpResponse) -> String {
    if let Ok(envelope) = serde_json::from_slice::<GraphErrorEnvelope>(&response.body) {
        let detail = match (envelope.error.code, envelope.error.message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (Some(code), None) => code,
            (None, Some(message)) => message,
            (None, None) => String::new(),
        };
        if !detail.is_empty() {
            return format!("{} {}", response.status, detail);
        }
    }

    let body = String::from_utf8_lossy(&response.body);
    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {}", response.status);
    }

    let truncated: String = body.chars().take(MAX_ERROR_BODY).collect();
    format!("HTTP {}: {}", response.status, truncated)
}
