//! # Core Configuration Module
//!
//! Provides configuration management for the SharePoint integration.
//!
//! ## Overview
//!
//! [`SharePointConfig`] holds the app registration credentials, the target
//! site and the upstream endpoints. It is loaded once at startup, either from
//! the process environment (with an optional `.env` file) or explicitly via
//! the builder.
//!
//! Credentials are **not** validated at load time: a missing client id,
//! secret or tenant becomes an empty string and surfaces later as a token
//! endpoint failure. Only the endpoint URLs are checked, since a malformed
//! base URL would otherwise produce confusing request errors on every call.
//!
//! ## Environment Variables
//!
//! | Variable                  | Field            | Default                              |
//! |---------------------------|------------------|--------------------------------------|
//! | `MICROSOFT_CLIENT_ID`     | `client_id`      | empty                                |
//! | `MICROSOFT_CLIENT_SECRET` | `client_secret`  | empty                                |
//! | `MICROSOFT_TENANT_ID`     | `tenant_id`      | empty                                |
//! | `SHAREPOINT_SITE_ID`      | `site_id`        | empty                                |
//! | `GRAPH_API_BASE_URL`      | `graph_base_url` | `https://graph.microsoft.com/v1.0`   |
//! | `MICROSOFT_AUTHORITY_URL` | `authority_url`  | `https://login.microsoftonline.com`  |
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::SharePointConfig;
//!
//! let config = SharePointConfig::from_env()?;
//!
//! let config = SharePointConfig::builder()
//!     .client_id("app-id")
//!     .client_secret("secret")
//!     .tenant_id("contoso.onmicrosoft.com")
//!     .site_id("contoso.sharepoint.com,1234,5678")
//!     .build()?;
//! ```

use crate::error::{Error, Result};

/// Default Microsoft Graph endpoint
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Default Microsoft identity platform authority
pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";

/// Default search term for site discovery
pub const DEFAULT_SITE_SEARCH: &str = "Contracts";

/// Configuration for the SharePoint integration.
///
/// Use [`SharePointConfig::from_env`] or [`SharePointConfig::builder`] to
/// construct instances.
#[derive(Clone, PartialEq, Eq)]
pub struct SharePointConfig {
    /// Azure AD application (client) id
    pub client_id: String,

    /// Azure AD application secret
    pub client_secret: String,

    /// Azure AD tenant id or domain
    pub tenant_id: String,

    /// SharePoint site whose default drive is browsed
    pub site_id: String,

    /// Graph API base URL, without trailing slash
    pub graph_base_url: String,

    /// Identity platform authority, without trailing slash
    pub authority_url: String,

    /// Search term used when the caller does not supply one
    pub default_site_search: String,
}

impl std::fmt::Debug for SharePointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharePointConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("site_id", &self.site_id)
            .field("graph_base_url", &self.graph_base_url)
            .field("authority_url", &self.authority_url)
            .field("default_site_search", &self.default_site_search)
            .finish()
    }
}

impl SharePointConfig {
    /// Create a new configuration builder
    pub fn builder() -> SharePointConfigBuilder {
        SharePointConfigBuilder::default()
    }

    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory (or any parent) is loaded
    /// first if present; variables already set in the environment win.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// [`from_env`](Self::from_env) delegates here with `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder()
            .client_id(lookup("MICROSOFT_CLIENT_ID").unwrap_or_default())
            .client_secret(lookup("MICROSOFT_CLIENT_SECRET").unwrap_or_default())
            .tenant_id(lookup("MICROSOFT_TENANT_ID").unwrap_or_default())
            .site_id(lookup("SHAREPOINT_SITE_ID").unwrap_or_default());

        if let Some(url) = lookup("GRAPH_API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            builder = builder.graph_base_url(url);
        }
        if let Some(url) = lookup("MICROSOFT_AUTHORITY_URL").filter(|v| !v.trim().is_empty()) {
            builder = builder.authority_url(url);
        }

        builder.build()
    }

    /// OAuth2 v2.0 token endpoint for the configured tenant
    pub fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority_url, self.tenant_id)
    }

    /// Whether all credential fields carry a value.
    ///
    /// Informational only; nothing refuses to run when this is false.
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty() && !self.tenant_id.is_empty()
    }
}

/// Builder for [`SharePointConfig`].
#[derive(Debug, Default)]
pub struct SharePointConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    tenant_id: Option<String>,
    site_id: Option<String>,
    graph_base_url: Option<String>,
    authority_url: Option<String>,
    default_site_search: Option<String>,
}

impl SharePointConfigBuilder {
    pub fn client_id(mut self, value: impl Into<String>) -> Self {
        self.client_id = Some(value.into());
        self
    }

    pub fn client_secret(mut self, value: impl Into<String>) -> Self {
        self.client_secret = Some(value.into());
        self
    }

    pub fn tenant_id(mut self, value: impl Into<String>) -> Self {
        self.tenant_id = Some(value.into());
        self
    }

    pub fn site_id(mut self, value: impl Into<String>) -> Self {
        self.site_id = Some(value.into());
        self
    }

    /// Override the Graph endpoint (sovereign clouds, test servers)
    pub fn graph_base_url(mut self, value: impl Into<String>) -> Self {
        self.graph_base_url = Some(value.into());
        self
    }

    /// Override the identity platform authority
    pub fn authority_url(mut self, value: impl Into<String>) -> Self {
        self.authority_url = Some(value.into());
        self
    }

    pub fn default_site_search(mut self, value: impl Into<String>) -> Self {
        self.default_site_search = Some(value.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if an endpoint URL is not an absolute
    /// `http`/`https` URL.
    pub fn build(self) -> Result<SharePointConfig> {
        let graph_base_url = normalize_url(
            "graph_base_url",
            self.graph_base_url
                .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string()),
        )?;
        let authority_url = normalize_url(
            "authority_url",
            self.authority_url
                .unwrap_or_else(|| DEFAULT_AUTHORITY_URL.to_string()),
        )?;

        Ok(SharePointConfig {
            client_id: self.client_id.unwrap_or_default(),
            client_secret: self.client_secret.unwrap_or_default(),
            tenant_id: self.tenant_id.unwrap_or_default(),
            site_id: self.site_id.unwrap_or_default(),
            graph_base_url,
            authority_url,
            default_site_search: self
                .default_site_search
                .unwrap_or_else(|| DEFAULT_SITE_SEARCH.to_string()),
        })
    }
}

fn normalize_url(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(Error::Config(format!(
            "{} must be an absolute http(s) URL, got '{}'",
            field, value
        )));
    }
    Ok(trimmed.to_string())
}
