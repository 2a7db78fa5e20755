//! HTTP Client Abstraction
//!
//! Request/response value types and the async [`HttpClient`] seam used by the
//! token provider and the Graph client.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

use crate::error::{BridgeError, Result};

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

/// HTTP request builder
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    pub fn accept_json(self) -> Self {
        self.header("Accept", "application/json")
    }

    /// Attach a form-encoded body (`application/x-www-form-urlencoded`).
    pub fn form<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self> {
        let encoded = serde_urlencoded::to_string(params).map_err(|e| {
            BridgeError::OperationFailed(format!("Form encoding failed: {}", e))
        })?;
        self.body = Some(Bytes::from(encoded));
        self.headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        Ok(self)
    }

    /// Attach a raw body with an explicit content type.
    pub fn content(mut self, body: Bytes, content_type: impl Into<String>) -> Self {
        self.body = Some(body);
        self.headers
            .insert("Content-Type".to_string(), content_type.into());
        self
    }

    /// Look up a header case-insensitively.
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Parse response body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            BridgeError::OperationFailed(format!("JSON deserialization failed: {}", e))
        })
    }

    /// Get response body as UTF-8 string
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| BridgeError::OperationFailed(format!("Invalid UTF-8: {}", e)))
    }

    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the server rejected the bearer token (401)
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Async HTTP client trait
///
/// One call sends one request. Implementations must not retry on their own:
/// the Graph API's throttling and error responses are surfaced to the caller
/// unchanged.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest};
///
/// async fn fetch_site(client: &dyn HttpClient, token: &str) -> Result<String> {
///     let request = HttpRequest::get("https://graph.microsoft.com/v1.0/sites/root")
///         .bearer_token(token);
///
///     let response = client.execute(request).await?;
///     response.text()
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request
    ///
    /// # Errors
    ///
    /// Returns error if the connection fails, TLS validation fails, the
    /// request times out or the body cannot be read. Non-2xx statuses are
    /// not errors at this layer.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_builder() {
        let request = HttpRequest::get("https://example.com")
            .header("User-Agent", "test")
            .bearer_token("secret")
            .accept_json();

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.header_value("user-agent"), Some("test"));
        assert_eq!(request.header_value("Authorization"), Some("Bearer secret"));
        assert_eq!(request.header_value("Accept"), Some("application/json"));
        assert!(request.body.is_none());
    }

    #[test]
    fn test_form_body_encoding() {
        let params = [("grant_type", "client_credentials"), ("scope", "a b")];
        let request = HttpRequest::new(HttpMethod::Post, "https://example.com/token")
            .form(&params)
            .unwrap();

        assert_eq!(
            request.header_value("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            request.body.as_deref(),
            Some(&b"grant_type=client_credentials&scope=a+b"[..])
        );
    }

    #[test]
    fn test_raw_content_body() {
        let request = HttpRequest::new(HttpMethod::Put, "https://example.com/upload")
            .content(Bytes::from_static(b"%PDF"), "application/octet-stream");

        assert_eq!(request.body, Some(Bytes::from_static(b"%PDF")));
        assert_eq!(
            request.header_value("content-type"),
            Some("application/octet-stream")
        );
    }

    #[test]
    fn test_http_response_status_checks() {
        let ok = HttpResponse::new(200, "test");
        assert!(ok.is_success());
        assert!(!ok.is_unauthorized());
        assert_eq!(ok.text().unwrap(), "test");

        let denied = HttpResponse::new(401, "");
        assert!(!denied.is_success());
        assert!(denied.is_unauthorized());
    }

    #[test]
    fn test_http_response_json() {
        let response = HttpResponse::new(200, r#"{"id":"abc"}"#);
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["id"], "abc");

        let broken = HttpResponse::new(200, "not json");
        assert!(broken.json::<serde_json::Value>().is_err());
    }
}
