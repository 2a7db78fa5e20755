//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the SharePoint integration:
//! - Logging and tracing infrastructure
//! - Configuration management (environment + builder)
//!
//! ## Overview
//!
//! Every other crate in the workspace takes its settings from
//! [`SharePointConfig`](config::SharePointConfig) and logs through `tracing`;
//! the host calls [`init_logging`](logging::init_logging) once at startup.

pub mod config;
pub mod error;
pub mod logging;

pub use config::SharePointConfig;
pub use error::{Error, Result};
