//! # Host Bridge Traits
//!
//! Platform abstraction traits the SharePoint integration depends on.
//!
//! ## Overview
//!
//! This crate defines the contract between the Graph-facing core and the
//! transport that actually talks to the network. The core only ever sees
//! [`HttpClient`](http::HttpClient); production hosts plug in the reqwest
//! adapter from `bridge-desktop`, tests plug in mocks or routed fakes.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Adapters
//! should convert transport-specific errors into it with an actionable message
//! (timeouts, connection failures, unreadable bodies).
//!
//! ## Thread Safety
//!
//! Bridge traits require `Send + Sync` so one client can be shared across
//! async tasks behind an `Arc`.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
