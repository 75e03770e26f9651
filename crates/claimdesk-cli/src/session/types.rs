//! CLI session and backend wrapper.

use anyhow::{Context, Result};
use async_trait::async_trait;

use claimdesk_core::{AccessToken, ApiUrl, Entity, EntitySync, Payload, Resource, ResourceApi};
use claimdesk_file::FileResource;
use claimdesk_rest::{RestConfig, RestResource};

/// A backend for one entity: the local file store or the REST API.
#[derive(Debug)]
pub enum CliBackend<T: Entity> {
    File(FileResource<T>),
    Rest(RestResource<T>),
}

#[async_trait]
impl<T: Entity> ResourceApi<T> for CliBackend<T> {
    async fn list(&self, token: &AccessToken) -> claimdesk_core::Result<Vec<T>> {
        match self {
            CliBackend::File(api) => api.list(token).await,
            CliBackend::Rest(api) => api.list(token).await,
        }
    }

    async fn get(&self, uuid: &str, token: &AccessToken) -> claimdesk_core::Result<T> {
        match self {
            CliBackend::File(api) => api.get(uuid, token).await,
            CliBackend::Rest(api) => api.get(uuid, token).await,
        }
    }

    async fn create(&self, payload: &Payload, token: &AccessToken) -> claimdesk_core::Result<T> {
        match self {
            CliBackend::File(api) => api.create(payload, token).await,
            CliBackend::Rest(api) => api.create(payload, token).await,
        }
    }

    async fn update(
        &self,
        uuid: &str,
        payload: &Payload,
        token: &AccessToken,
    ) -> claimdesk_core::Result<T> {
        match self {
            CliBackend::File(api) => api.update(uuid, payload, token).await,
            CliBackend::Rest(api) => api.update(uuid, payload, token).await,
        }
    }

    async fn delete(&self, uuid: &str, token: &AccessToken) -> claimdesk_core::Result<()> {
        match self {
            CliBackend::File(api) => api.delete(uuid, token).await,
            CliBackend::Rest(api) => api.delete(uuid, token).await,
        }
    }

    async fn restore(&self, uuid: &str, token: &AccessToken) -> claimdesk_core::Result<T> {
        match self {
            CliBackend::File(api) => api.restore(uuid, token).await,
            CliBackend::Rest(api) => api.restore(uuid, token).await,
        }
    }
}

/// Stored login state.
#[derive(Debug, Clone)]
pub struct CliSession {
    pub api: ApiUrl,
    pub token: AccessToken,
    pub csrf_path: Option<String>,
}

impl CliSession {
    pub fn backend_name(&self) -> &'static str {
        if self.api.is_local() { "file" } else { "rest" }
    }

    /// Build the backend for entity `T`.
    pub fn backend<T: Entity>(&self) -> Result<CliBackend<T>> {
        tracing::debug!(api = %self.api, backend = self.backend_name(), entity = T::RESOURCE.name, "Selecting backend");
        if self.api.is_local() {
            let path = self
                .api
                .to_file_path()
                .context("Failed to convert file:// URL to path")?;
            return Ok(CliBackend::File(FileResource::open(path)));
        }

        let mut config = RestConfig::new(self.api.clone());
        if let Some(path) = &self.csrf_path {
            config = config.with_csrf_path(path.clone());
        }
        let api = RestResource::from_config(config).context("Failed to build HTTP client")?;
        Ok(CliBackend::Rest(api))
    }

    /// Sync handlers for entity `T`, not yet mounted.
    pub fn sync<T: Entity>(&self) -> Result<EntitySync<T, CliBackend<T>>> {
        let resource = Resource::new(self.backend::<T>()?, Some(self.token.clone()));
        Ok(EntitySync::new(resource))
    }
}
