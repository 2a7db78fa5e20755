//! Workspace placeholder crate.
//!
//! This crate exposes the feature flags that map to the individual workspace
//! crates. Host applications (the HTTP routing layer of the contract renewal
//! backend) can depend on `contract-renewal-workspace` with `desktop-shims`
//! enabled and reach the SharePoint façade without wiring each crate.

#[cfg(feature = "desktop-shims")]
pub use core_service::{
    bootstrap_desktop, ConnectionStatus, ServiceError, SharePointService, SiteFiles, StatusReport,
};
