use chrono::{DateTime, Utc};
use std::fmt;

/// Bearer token issued by the identity platform.
///
/// The token is treated as valid until the Graph API rejects it; the
/// advertised lifetime is kept for diagnostics only and never triggers a
/// renewal on its own.
///
/// # Security
///
/// The `Debug` implementation redacts the token value. Use
/// [`AccessToken::secret`] only when building an `Authorization` header.
///
/// # Examples
///
/// ```
/// use core_auth::AccessToken;
///
/// let token = AccessToken::new("eyJ0eXAi...", Some(3599));
/// assert_eq!(token.secret(), "eyJ0eXAi...");
/// assert!(!format!("{:?}", token).contains("eyJ0eXAi"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    acquired_at: DateTime<Utc>,
    expires_in: Option<i64>,
}

impl AccessToken {
    /// Wrap a freshly issued token value
    pub fn new(value: impl Into<String>, expires_in: Option<i64>) -> Self {
        Self {
            value: value.into(),
            acquired_at: Utc::now(),
            expires_in,
        }
    }

    /// The raw bearer value
    pub fn secret(&self) -> &str {
        &self.value
    }

    /// When the token was obtained
    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    /// Lifetime advertised by the token endpoint, in seconds
    pub fn expires_in(&self) -> Option<i64> {
        self.expires_in
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("acquired_at", &self.acquired_at)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let token = AccessToken::new("very-secret-token", Some(3600));
        let rendered = format!("{:?}", token);

        assert!(!rendered.contains("very-secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_accessors() {
        let before = Utc::now();
        let token = AccessToken::new("abc", None);

        assert_eq!(token.secret(), "abc");
        assert_eq!(token.expires_in(), None);
        assert!(token.acquired_at() >= before);
    }
}
