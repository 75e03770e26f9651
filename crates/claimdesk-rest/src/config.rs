//! Client configuration.

use claimdesk_core::{ApiUrl, CsrfToken};

/// Default path that issues the `XSRF-TOKEN` cookie (Laravel Sanctum).
pub const DEFAULT_CSRF_PATH: &str = "/sanctum/csrf-cookie";

/// Configuration for a [`RestClient`](crate::RestClient).
#[derive(Debug, Clone)]
pub struct RestConfig {
    api: ApiUrl,
    user_agent: String,
    csrf_path: Option<String>,
    csrf_token: Option<CsrfToken>,
}

impl RestConfig {
    /// Configuration with no CSRF handling.
    pub fn new(api: ApiUrl) -> Self {
        Self {
            api,
            user_agent: concat!("claimdesk/", env!("CARGO_PKG_VERSION")).to_string(),
            csrf_path: None,
            csrf_token: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Fetch a CSRF cookie from `path` before the first mutating request.
    pub fn with_csrf_path(mut self, path: impl Into<String>) -> Self {
        self.csrf_path = Some(path.into());
        self
    }

    /// Send a known CSRF token on mutating requests instead of fetching one.
    pub fn with_csrf_token(mut self, token: CsrfToken) -> Self {
        self.csrf_token = Some(token);
        self
    }

    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn csrf_path(&self) -> Option<&str> {
        self.csrf_path.as_deref()
    }

    pub fn csrf_token(&self) -> Option<&CsrfToken> {
        self.csrf_token.as_ref()
    }
}
