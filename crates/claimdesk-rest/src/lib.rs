//! claimdesk-rest - HTTP-backed resource implementation.
//!
//! [`RestResource`] implements [`ResourceApi`](claimdesk_core::ResourceApi)
//! against the admin backend's REST conventions, normalizing every response
//! through [`claimdesk_core::envelope`].

mod client;
mod config;
mod resource;

pub use client::RestClient;
pub use config::{DEFAULT_CSRF_PATH, RestConfig};
pub use resource::RestResource;
