//! SharePoint connector implementation
//!
//! Site-level operations on top of [`GraphClient`]: drive resolution, the
//! recursive file listing, downloads, site search and uploads.

use bridge_traits::http::HttpClient;
use bytes::Bytes;
use core_runtime::config::SharePointConfig;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SharePointError};
use crate::graph::GraphClient;
use crate::session::GraphSession;
use crate::traversal::{drive_root_url, walk_drive};
use crate::types::{DriveId, Traversal};

/// Content type used for uploads
const UPLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// SharePoint site connector
///
/// Bound to one configured site; every operation takes the caller's
/// [`GraphSession`], which caches the token and the site's drive id.
///
/// # Example
///
/// ```ignore
/// use provider_sharepoint::{GraphSession, SharePointConnector};
///
/// let connector = SharePointConnector::from_config(&config, http_client);
/// let mut session = GraphSession::new();
/// let listing = connector.list_site_files(&mut session).await?;
/// ```
pub struct SharePointConnector {
    graph: GraphClient,
    site_id: String,
}

impl SharePointConnector {
    /// Create a new connector
    ///
    /// # Arguments
    ///
    /// * `graph` - Authenticated Graph client
    /// * `site_id` - Site whose default drive is browsed
    pub fn new(graph: GraphClient, site_id: impl Into<String>) -> Self {
        Self {
            graph,
            site_id: site_id.into(),
        }
    }

    /// Build the connector, Graph client and token provider from configuration
    pub fn from_config(config: &SharePointConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(
            GraphClient::from_config(config, http_client),
            config.site_id.clone(),
        )
    }

    pub fn graph(&self) -> &GraphClient {
        &self.graph
    }

    /// Configured site id
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    fn site_root_children_url(&self, site_id: &str) -> String {
        format!("{}/sites/{}/drive/root/children", self.graph.base_url(), site_id)
    }

    /// Resolve the drive behind `site_id`, caching it in the session.
    ///
    /// The drive id is read from `parentReference.driveId` of the first item
    /// in the site's root listing. Once cached, later calls return it without
    /// a request, whatever `site_id` they pass.
    ///
    /// # Errors
    ///
    /// [`SharePointError::DriveUnavailable`] if the root listing is empty or
    /// its first item has no drive reference; request errors otherwise.
    #[instrument(skip(self, session))]
    pub async fn resolve_drive(&self, session: &mut GraphSession, site_id: &str) -> Result<DriveId> {
        if let Some(drive_id) = session.drive_id() {
            debug!(drive_id = %drive_id, "Using cached drive id");
            return Ok(drive_id.clone());
        }

        let page = self
            .graph
            .get_page(session, &self.site_root_children_url(site_id))
            .await?;

        let drive_id = page
            .value
            .first()
            .and_then(|item| item.drive_id())
            .ok_or_else(|| {
                SharePointError::DriveUnavailable(format!(
                    "site {} returned no items with a drive reference",
                    site_id
                ))
            })?;

        info!(drive_id = %drive_id, "Resolved site drive");

        Ok(session.remember_drive_id(drive_id).clone())
    }

    /// Walk a drive from an arbitrary collection URL.
    pub async fn list_all_files(
        &self,
        session: &mut GraphSession,
        drive_id: &DriveId,
        root_url: &str,
    ) -> Traversal {
        walk_drive(&self.graph, session, drive_id, root_url).await
    }

    /// Walk a whole drive from its root.
    pub async fn list_drive_files(&self, session: &mut GraphSession, drive_id: &DriveId) -> Traversal {
        let root_url = drive_root_url(self.graph.base_url(), drive_id);
        self.list_all_files(session, drive_id, &root_url).await
    }

    /// Every file in the configured site's drive.
    ///
    /// Resolves (or reuses) the drive id, then walks the drive root.
    #[instrument(skip(self, session), fields(site_id = %self.site_id))]
    pub async fn list_site_files(&self, session: &mut GraphSession) -> Result<Traversal> {
        let drive_id = self.resolve_drive(session, &self.site_id).await?;
        Ok(self.list_drive_files(session, &drive_id).await)
    }

    /// Download a file's content from the configured site's drive.
    ///
    /// If the session has no drive id yet, the site is listed first purely
    /// to learn it; the listing itself is discarded.
    #[instrument(skip(self, session))]
    pub async fn download(&self, session: &mut GraphSession, file_id: &str) -> Result<Bytes> {
        let mut listing_error = None;
        if session.drive_id().is_none() {
            info!("Drive id not cached, listing site files to learn it");
            if let Err(e) = self.list_site_files(session).await {
                warn!(error = %e, "Site listing before download failed");
                listing_error = Some(e.to_string());
            }
        }

        let drive_id = session.drive_id().cloned().ok_or_else(|| {
            SharePointError::DriveUnavailable(match listing_error {
                Some(cause) => format!("cannot download file ({})", cause),
                None => "cannot download file".to_string(),
            })
        })?;

        let url = format!(
            "{}/drives/{}/items/{}/content",
            self.graph.base_url(),
            drive_id,
            file_id
        );

        let content = self.graph.get_bytes(session, &url).await?;

        info!(bytes = content.len(), "Downloaded file");

        Ok(content)
    }

    /// Search sites by keyword (`GET /sites?search=`)
    #[instrument(skip(self, session))]
    pub async fn search_sites(&self, session: &mut GraphSession, term: &str) -> Result<Value> {
        let url = format!(
            "{}/sites?search={}",
            self.graph.base_url(),
            urlencoding::encode(term)
        );
        self.graph.get(session, &url).await
    }

    /// Metadata of the configured site
    #[instrument(skip(self, session), fields(site_id = %self.site_id))]
    pub async fn site_info(&self, session: &mut GraphSession) -> Result<Value> {
        let url = format!("{}/sites/{}", self.graph.base_url(), self.site_id);
        self.graph.get(session, &url).await
    }

    /// First page of a site's drive root, unflattened
    #[instrument(skip(self, session))]
    pub async fn site_root_children(&self, session: &mut GraphSession, site_id: &str) -> Result<Value> {
        self.graph
            .get(session, &self.site_root_children_url(site_id))
            .await
    }

    /// Upload `content` as `filename` into the root of a site's drive.
    ///
    /// Returns the created (or replaced) driveItem.
    #[instrument(skip(self, session, content), fields(bytes = content.len()))]
    pub async fn upload(
        &self,
        session: &mut GraphSession,
        site_id: &str,
        content: Bytes,
        filename: &str,
    ) -> Result<Value> {
        let url = format!(
            "{}/sites/{}/drive/root:/{}:/content",
            self.graph.base_url(),
            site_id,
            urlencoding::encode(filename)
        );

        let item = self
            .graph
            .put(session, &url, content, UPLOAD_CONTENT_TYPE)
            .await?;

        info!(item_id = ?item.get("id"), "Uploaded file");

        Ok(item)
    }
}
