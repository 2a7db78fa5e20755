//! Core service façade and bootstrap helpers.
//!
//! This crate wires a host-provided HTTP bridge and the SharePoint
//! configuration into one [`SharePointService`], the surface the HTTP routing
//! layer calls. Server builds enable the `desktop-shims` feature (which
//! depends on `bridge-desktop`) to get a reqwest-backed client and
//! [`bootstrap_desktop`].
//!
//! The service owns a single [`GraphSession`] behind an async mutex, so
//! concurrent callers are served one at a time: the first populates the token
//! and drive id caches and later callers reuse them.

pub mod error;

pub use error::{Result, ServiceError};

use std::sync::Arc;

use bridge_traits::http::HttpClient;
use bytes::Bytes;
use core_runtime::config::SharePointConfig;
use provider_sharepoint::{
    DriveItem, GraphSession, SharePointConnector, SharePointError, Traversal, TraversalWarning,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// Files payload: `{ "value": [...] }`, plus `"warnings"` when a branch of
/// the folder tree could not be listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteFiles {
    pub value: Vec<DriveItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TraversalWarning>,
}

impl From<Traversal> for SiteFiles {
    fn from(traversal: Traversal) -> Self {
        Self {
            value: traversal.files,
            warnings: traversal.warnings,
        }
    }
}

/// Outcome of the connectivity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error,
}

/// Status payload: `{ "status": ..., "message": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: ConnectionStatus,
    pub message: String,
}

impl StatusReport {
    fn connected() -> Self {
        Self {
            status: ConnectionStatus::Connected,
            message: "SharePoint integration is working".to_string(),
        }
    }

    fn disconnected() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            message: "Failed to get access token".to_string(),
        }
    }

    fn error(detail: impl std::fmt::Display) -> Self {
        Self {
            status: ConnectionStatus::Error,
            message: format!("SharePoint integration error: {}", detail),
        }
    }
}

/// Primary façade exposed to the routing layer.
pub struct SharePointService {
    connector: SharePointConnector,
    session: Mutex<GraphSession>,
    default_search: String,
}

impl SharePointService {
    /// Create a service around an existing connector.
    pub fn new(connector: SharePointConnector, default_search: impl Into<String>) -> Self {
        Self {
            connector,
            session: Mutex::new(GraphSession::new()),
            default_search: default_search.into(),
        }
    }

    /// Create a service from configuration and an explicit HTTP bridge.
    pub fn with_http_client(config: &SharePointConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(
            SharePointConnector::from_config(config, http_client),
            config.default_site_search.clone(),
        )
    }

    /// Create a service backed by the reqwest HTTP client.
    #[cfg(feature = "desktop-shims")]
    pub fn from_config(config: &SharePointConfig) -> Result<Self> {
        let http_client = bridge_desktop::ReqwestHttpClient::new()
            .map_err(|err| ServiceError::InitializationFailed(err.to_string()))?;
        Ok(Self::with_http_client(config, Arc::new(http_client)))
    }

    /// Site this service browses
    pub fn site_id(&self) -> &str {
        self.connector.site_id()
    }

    /// Search sites; `None` searches for the configured default term.
    #[instrument(skip(self))]
    pub async fn get_sites(&self, search_term: Option<&str>) -> Result<Value> {
        let term = search_term.unwrap_or(self.default_search.as_str());
        let mut session = self.session.lock().await;
        self.connector
            .search_sites(&mut session, term)
            .await
            .map_err(ServiceError::sharepoint("fetch SharePoint sites"))
    }

    #[instrument(skip(self))]
    pub async fn get_specific_site_info(&self) -> Result<Value> {
        let mut session = self.session.lock().await;
        self.connector
            .site_info(&mut session)
            .await
            .map_err(ServiceError::sharepoint("fetch site info"))
    }

    /// Every file in the configured site, flattened across folders.
    #[instrument(skip(self))]
    pub async fn get_specific_site_files(&self) -> Result<SiteFiles> {
        let mut session = self.session.lock().await;
        let traversal = self
            .connector
            .list_site_files(&mut session)
            .await
            .map_err(ServiceError::sharepoint("fetch specific site files"))?;

        if !traversal.is_complete() {
            warn!(
                skipped_branches = traversal.warnings.len(),
                "Site listing is incomplete"
            );
        }

        Ok(SiteFiles::from(traversal))
    }

    /// Root listing of any site's drive, as Graph returned it.
    #[instrument(skip(self))]
    pub async fn get_site_files(&self, site_id: &str) -> Result<Value> {
        let mut session = self.session.lock().await;
        self.connector
            .site_root_children(&mut session, site_id)
            .await
            .map_err(ServiceError::sharepoint("fetch site files"))
    }

    #[instrument(skip(self))]
    pub async fn download_file(&self, file_id: &str) -> Result<Bytes> {
        let mut session = self.session.lock().await;
        self.connector
            .download(&mut session, file_id)
            .await
            .map_err(ServiceError::sharepoint("download SharePoint file"))
    }

    #[instrument(skip(self, content))]
    pub async fn upload_file(&self, site_id: &str, content: Bytes, filename: &str) -> Result<Value> {
        let mut session = self.session.lock().await;
        self.connector
            .upload(&mut session, site_id, content, filename)
            .await
            .map_err(ServiceError::sharepoint("upload SharePoint file"))
    }

    /// Check connectivity by acquiring a fresh token.
    ///
    /// The cached token is dropped first; on success the new one is kept.
    #[instrument(skip(self))]
    pub async fn get_status(&self) -> StatusReport {
        let mut session = self.session.lock().await;

        match self.connector.graph().refresh_token(&mut session).await {
            Ok(_) => {
                info!("SharePoint connection verified");
                StatusReport::connected()
            }
            Err(SharePointError::Auth(e)) if e.is_unavailable() => {
                warn!(error = %e, "SharePoint token unavailable");
                StatusReport::disconnected()
            }
            Err(e) => {
                warn!(error = %e, "SharePoint status check failed");
                StatusReport::error(e)
            }
        }
    }
}

/// Convenience bootstrapper for server hosts.
///
/// Loads [`SharePointConfig`] from the environment (and `.env`) and builds a
/// reqwest-backed service.
///
/// ```ignore
/// let service = core_service::bootstrap_desktop()?;
/// let status = service.get_status().await;
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop() -> Result<SharePointService> {
    let config = SharePointConfig::from_env()?;
    if !config.has_credentials() {
        warn!("SharePoint credentials are not fully configured");
    }
    SharePointService::from_config(&config)
}
