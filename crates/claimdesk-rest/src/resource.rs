//! REST-backed resource implementation.

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use tracing::{debug, instrument};

use claimdesk_core::envelope::{deletion_from_value, list_from_value, record_from_value};
use claimdesk_core::error::InvalidInputError;
use claimdesk_core::{AccessToken, Entity, Payload, ResourceApi, Result, Route};

use crate::client::RestClient;
use crate::config::RestConfig;

fn require_uuid(uuid: &str) -> Result<()> {
    if uuid.trim().is_empty() {
        return Err(InvalidInputError::EmptyUuid.into());
    }
    Ok(())
}

/// One entity's endpoints on the admin API.
pub struct RestResource<T> {
    client: RestClient,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> RestResource<T> {
    /// Use an existing client; clients can be shared across entities.
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    pub fn from_config(config: RestConfig) -> Result<Self> {
        Ok(Self::new(RestClient::new(config)?))
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    async fn record(&self, route: Route<'_>, payload: Option<&Payload>, token: &AccessToken) -> Result<T> {
        let body = self.client.send(&T::RESOURCE, route, payload, token).await?;
        record_from_value(body, route.unwraps(&T::RESOURCE))
    }
}

impl<T> Clone for RestResource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> fmt::Debug for RestResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestResource")
            .field("entity", &T::RESOURCE.name)
            .field("api", self.client.config().api())
            .finish()
    }
}

#[async_trait]
impl<T: Entity> ResourceApi<T> for RestResource<T> {
    #[instrument(skip(self, token), fields(entity = T::RESOURCE.name))]
    async fn list(&self, token: &AccessToken) -> Result<Vec<T>> {
        let body = self.client.send(&T::RESOURCE, Route::List, None, token).await?;
        let items = list_from_value(body)?;
        debug!(count = items.len(), "Listed records");
        Ok(items)
    }

    #[instrument(skip(self, token), fields(entity = T::RESOURCE.name))]
    async fn get(&self, uuid: &str, token: &AccessToken) -> Result<T> {
        require_uuid(uuid)?;
        self.record(Route::Get(uuid), None, token).await
    }

    #[instrument(skip(self, payload, token), fields(entity = T::RESOURCE.name))]
    async fn create(&self, payload: &Payload, token: &AccessToken) -> Result<T> {
        self.record(Route::Create, Some(payload), token).await
    }

    #[instrument(skip(self, payload, token), fields(entity = T::RESOURCE.name))]
    async fn update(&self, uuid: &str, payload: &Payload, token: &AccessToken) -> Result<T> {
        require_uuid(uuid)?;
        self.record(Route::Update(uuid), Some(payload), token).await
    }

    #[instrument(skip(self, token), fields(entity = T::RESOURCE.name))]
    async fn delete(&self, uuid: &str, token: &AccessToken) -> Result<()> {
        require_uuid(uuid)?;
        let body = self
            .client
            .send(&T::RESOURCE, Route::Delete(uuid), None, token)
            .await?;
        deletion_from_value(body)
    }

    #[instrument(skip(self, token), fields(entity = T::RESOURCE.name))]
    async fn restore(&self, uuid: &str, token: &AccessToken) -> Result<T> {
        require_uuid(uuid)?;
        self.record(Route::Restore(uuid), None, token).await
    }
}
