use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token request failed: {0}")]
    Network(String),

    #[error("Token endpoint returned {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("Token response did not contain an access token")]
    MissingAccessToken,

    #[error("Malformed token response: {0}")]
    MalformedResponse(String),
}

impl AuthError {
    /// Whether the failure means "no token could be obtained" as opposed to
    /// an unexpected fault while talking to the identity provider.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, AuthError::MalformedResponse(_))
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
