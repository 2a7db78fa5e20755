use provider_sharepoint::SharePointError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    /// A SharePoint operation failed; `operation` reads as "Failed to {operation}".
    #[error("Failed to {operation}: {source}")]
    SharePoint {
        operation: &'static str,
        #[source]
        source: SharePointError,
    },
}

impl ServiceError {
    pub(crate) fn sharepoint(operation: &'static str) -> impl FnOnce(SharePointError) -> Self {
        move |source| Self::SharePoint { operation, source }
    }

    /// HTTP status the boundary layer should answer with.
    pub fn status_code(&self) -> u16 {
        500
    }

    /// Message for the response body
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
