//! # Authentication Module
//!
//! App-only authentication against the Microsoft identity platform.
//!
//! ## Overview
//!
//! The SharePoint integration runs as a daemon application: it holds a client
//! id and secret, and exchanges them for a bearer token with the OAuth 2.0
//! client-credentials grant. There is no user sign-in, no refresh token and
//! no persistent token storage; callers keep the returned [`AccessToken`] in
//! their session and ask for a new one when the Graph API rejects it.
//!
//! ## Features
//!
//! - Client-credentials token acquisition ([`TokenProvider`])
//! - Redacted token type that never leaks through `Debug`
//! - Error taxonomy separating "no token" outcomes from malformed responses

pub mod error;
pub mod oauth;
pub mod types;

pub use error::{AuthError, Result};
pub use oauth::{ClientCredentialsConfig, TokenProvider, GRAPH_DEFAULT_SCOPE};
pub use types::AccessToken;
