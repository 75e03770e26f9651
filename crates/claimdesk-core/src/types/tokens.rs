//! Token types for API authentication.

use std::fmt;

/// A bearer token for authenticated API requests.
///
/// Issued by the external session/auth collaborator; this crate only carries
/// it into `Authorization` headers.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the token is empty (treated as "not logged in").
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A CSRF token echoed back on mutating requests.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Create a new CSRF token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for the `X-XSRF-TOKEN` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CsrfToken").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_hides_value_in_debug() {
        let token = AccessToken::new("42|sanctum-personal-access-token");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("sanctum"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn blank_token_is_empty() {
        assert!(AccessToken::new("  ").is_empty());
        assert!(!AccessToken::new("abc").is_empty());
    }

    #[test]
    fn csrf_token_hides_value_in_debug() {
        let token = CsrfToken::new("eyJpdiI6");
        assert!(!format!("{:?}", token).contains("eyJpdiI6"));
    }
}
