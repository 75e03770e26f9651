//! Validated configuration and credential types.

mod api_url;
mod tokens;

pub use api_url::ApiUrl;
pub use tokens::{AccessToken, CsrfToken};
