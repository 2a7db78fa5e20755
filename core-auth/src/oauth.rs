//! OAuth 2.0 Client-Credentials Token Provider
//!
//! Implements the app-only flow of RFC 6749 §4.4 against the Microsoft
//! identity platform v2.0 endpoint.
//!
//! # Overview
//!
//! One call to [`TokenProvider::acquire`] performs exactly one POST to
//! `{authority}/{tenant}/oauth2/v2.0/token` with:
//!
//! - `grant_type=client_credentials`
//! - `client_id` / `client_secret`
//! - `scope=https://graph.microsoft.com/.default`
//!
//! Nothing is cached here. The caller owns the token (see the Graph session
//! in `provider-sharepoint`) and decides when to ask for a new one.
//!
//! # Security
//!
//! Client secrets and token values are never logged.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::oauth::{ClientCredentialsConfig, TokenProvider};
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let config = ClientCredentialsConfig::new(
//!     "client-id",
//!     "client-secret",
//!     "https://login.microsoftonline.com/contoso/oauth2/v2.0/token",
//! );
//!
//! let provider = TokenProvider::new(config, http_client);
//! let token = provider.acquire().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::AccessToken;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use core_runtime::config::SharePointConfig;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Scope requesting every application permission granted to the app
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Client-credentials grant configuration.
#[derive(Clone)]
pub struct ClientCredentialsConfig {
    /// Application (client) id
    pub client_id: String,
    /// Application secret
    pub client_secret: String,
    /// Token endpoint URL
    pub token_url: String,
    /// Requested scope
    pub scope: String,
}

impl ClientCredentialsConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: token_url.into(),
            scope: GRAPH_DEFAULT_SCOPE.to_string(),
        }
    }
}

impl From<&SharePointConfig> for ClientCredentialsConfig {
    fn from(config: &SharePointConfig) -> Self {
        Self::new(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.token_url(),
        )
    }
}

impl std::fmt::Debug for ClientCredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentialsConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Acquires bearer tokens with the client-credentials grant.
pub struct TokenProvider {
    config: ClientCredentialsConfig,
    http_client: Arc<dyn HttpClient>,
}

impl TokenProvider {
    /// Create a new token provider.
    ///
    /// # Arguments
    ///
    /// * `config` - App registration and endpoint
    /// * `http_client` - HTTP client for the token request
    pub fn new(config: ClientCredentialsConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Token endpoint this provider posts to
    pub fn token_url(&self) -> &str {
        &self.config.token_url
    }

    /// Request a new access token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Network`] if the request could not be sent
    /// - [`AuthError::TokenEndpoint`] if the endpoint answered non-2xx
    /// - [`AuthError::MissingAccessToken`] if a 2xx body carried no token
    /// - [`AuthError::MalformedResponse`] if the body is not a JSON object
    #[instrument(skip(self), fields(token_url = %self.config.token_url))]
    pub async fn acquire(&self) -> Result<AccessToken> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", self.config.scope.as_str()),
        ];

        let request = HttpRequest::new(HttpMethod::Post, self.config.token_url.clone())
            .form(&params)
            .map_err(|e| AuthError::Network(e.to_string()))?;

        debug!("Requesting client-credentials token");

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(error = %e, "Access token request failed");
            AuthError::Network(e.to_string())
        })?;

        if !response.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            warn!(status = response.status, error = %body, "Token endpoint rejected request");

            return Err(AuthError::TokenEndpoint {
                status: response.status,
                body,
            });
        }

        let token_response: TokenResponse = response
            .json()
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        let access_token = token_response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingAccessToken)?;

        info!(
            expires_in = ?token_response.expires_in,
            "Acquired access token"
        );

        Ok(AccessToken::new(access_token, token_response.expires_in))
    }
}

/// Token response from the identity platform.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}
