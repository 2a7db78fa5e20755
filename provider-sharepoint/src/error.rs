//! Error types for the SharePoint provider

use core_auth::AuthError;
use thiserror::Error;

/// SharePoint provider errors
#[derive(Error, Debug)]
pub enum SharePointError {
    /// Token acquisition failed
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Graph request failed in transport or returned a non-2xx status.
    /// `status` is `None` when no response was received.
    #[error("Graph API error: {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// The drive id could not be learned from the site listing
    #[error("Drive ID not available: {0}")]
    DriveUnavailable(String),

    /// Failed to parse API response
    #[error("Failed to parse Graph response: {0}")]
    Parse(String),
}

impl SharePointError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        SharePointError::Api {
            status: None,
            message: message.into(),
        }
    }

    /// HTTP status returned by Graph, if the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            SharePointError::Api { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type for SharePoint operations
pub type Result<T> = std::result::Result<T, SharePointError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SharePointError::Api {
            status: Some(404),
            message: "404 itemNotFound: The resource could not be found.".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Graph API error: 404 itemNotFound: The resource could not be found."
        );
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn test_auth_error_conversion() {
        let error: SharePointError = AuthError::MissingAccessToken.into();

        assert!(matches!(error, SharePointError::Auth(_)));
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let error = SharePointError::transport("connection reset");
        assert_eq!(error.status(), None);
        assert_eq!(error.to_string(), "Graph API error: connection reset");
    }
}
