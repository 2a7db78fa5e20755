//! # SharePoint Provider
//!
//! Browses and downloads files from a SharePoint site's document library
//! through the Microsoft Graph API.
//!
//! ## Overview
//!
//! This module provides:
//! - [`GraphSession`]: caller-owned cache of the bearer token and drive id
//! - [`GraphClient`]: authenticated GET/PUT with one reactive token refresh on 401
//! - [`SharePointConnector`]: drive resolution, recursive file listing,
//!   downloads, site search and uploads
//! - [`walk_drive`](traversal::walk_drive): depth-first flattening of a
//!   paginated folder tree into files plus per-branch warnings
//!
//! Every request is awaited before the next one is sent; nothing fans out.
//!
//! ## Example
//!
//! ```ignore
//! use provider_sharepoint::{GraphSession, SharePointConnector};
//!
//! let connector = SharePointConnector::from_config(&config, http_client);
//! let mut session = GraphSession::new();
//!
//! let listing = connector.list_site_files(&mut session).await?;
//! for warning in &listing.warnings {
//!     tracing::warn!(url = %warning.url, "branch skipped: {}", warning.message);
//! }
//!
//! let pdf = connector.download(&mut session, &listing.files[0].id).await?;
//! ```

pub mod connector;
pub mod error;
pub mod graph;
pub mod session;
pub mod traversal;
pub mod types;

pub use connector::SharePointConnector;
pub use error::{Result, SharePointError};
pub use graph::GraphClient;
pub use session::GraphSession;
pub use traversal::walk_drive;
pub use types::{DriveId, DriveItem, DriveItemPage, Traversal, TraversalWarning};
